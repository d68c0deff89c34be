pub mod derive;
pub mod record;

pub use derive::{derive, derive_statements, DerivedStatement, StatementRow, StatementValue};
pub use record::{is_derived_label, validate_series, FinancialYearRecord, LineItem};

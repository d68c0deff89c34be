//! Mapping between persisted record shapes and calculator inputs.
//!
//! Zero-filling absent values happens here and only here.

pub mod catalog;
pub mod financial_year;
pub mod scenario;

pub use catalog::{ScenarioCatalog, ScenarioRecord, ScenarioSummary};
pub use financial_year::{adapt_financial_years, StoredFinancialYear};
pub use scenario::{MissingFields, StoredScenario};

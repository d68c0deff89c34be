pub mod error;
pub mod format;
pub mod types;

#[cfg(feature = "statement")]
pub mod statement;

#[cfg(feature = "forecast")]
pub mod forecast;

#[cfg(feature = "stress")]
pub mod stress;

#[cfg(feature = "records")]
pub mod records;

pub use error::SustainError;
pub use types::*;

/// Standard result type for all engine operations
pub type SustainResult<T> = Result<T, SustainError>;

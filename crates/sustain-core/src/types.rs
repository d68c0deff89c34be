use serde::{Deserialize, Serialize};

use crate::error::SustainError;
use crate::SustainResult;

/// All monetary values. Plain IEEE-754 so overflow and NaN reach the caller untouched.
pub type Money = f64;

/// Rates expressed as percentages (4.2 = 4.2%) unless a field says otherwise.
pub type Percent = f64;

/// A ratio of some line to net sales.
///
/// `Undefined` is the explicit "no value" marker used when net sales is zero;
/// it is never read as 0%.
///
/// On the wire both `Undefined` and a non-finite `Fraction` become `null`,
/// so an overflowed ratio reads back as `Undefined`. Callers that need to
/// tell them apart must check the envelope warnings or the raw amounts.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "Option<f64>", into = "Option<f64>")]
pub enum Ratio {
    Fraction(f64),
    Undefined,
}

impl Ratio {
    /// `numerator / denominator`, or `Undefined` when the denominator is exactly zero.
    pub fn of(numerator: f64, denominator: f64) -> Self {
        if denominator == 0.0 {
            Ratio::Undefined
        } else {
            Ratio::Fraction(numerator / denominator)
        }
    }

    pub fn value(self) -> Option<f64> {
        match self {
            Ratio::Fraction(v) => Some(v),
            Ratio::Undefined => None,
        }
    }

    pub fn is_undefined(self) -> bool {
        matches!(self, Ratio::Undefined)
    }
}

impl From<Option<f64>> for Ratio {
    fn from(v: Option<f64>) -> Self {
        v.map_or(Ratio::Undefined, Ratio::Fraction)
    }
}

impl From<Ratio> for Option<f64> {
    fn from(r: Ratio) -> Self {
        r.value()
    }
}

/// Standard computation output envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationOutput<T: Serialize> {
    pub result: T,
    pub methodology: String,
    pub assumptions: serde_json::Value,
    pub warnings: Vec<String>,
    pub metadata: ComputationMetadata,
}

/// Metadata for every computation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationMetadata {
    pub version: String,
    pub computation_time_us: u64,
    pub precision: String,
}

/// Helper to wrap computation results with metadata
pub fn with_metadata<T: Serialize>(
    methodology: &str,
    assumptions: &impl Serialize,
    warnings: Vec<String>,
    elapsed_us: u64,
    result: T,
) -> ComputationOutput<T> {
    for w in &warnings {
        tracing::warn!(methodology, warning = %w, "computation warning");
    }
    ComputationOutput {
        result,
        methodology: methodology.to_string(),
        assumptions: serde_json::to_value(assumptions).unwrap_or_default(),
        warnings,
        metadata: ComputationMetadata {
            version: env!("CARGO_PKG_VERSION").to_string(),
            computation_time_us: elapsed_us,
            precision: "f64_ieee754".to_string(),
        },
    }
}

/// Earliest and latest calendar year accepted on input.
pub const MIN_YEAR: i32 = 1;
pub const MAX_YEAR: i32 = 9_999;

/// Longest horizon, term or scenario span accepted on input, in years.
pub const MAX_SPAN_YEARS: u32 = 1_000;

/// Reject NaN and infinities on the way in. Computed values are never checked.
pub(crate) fn ensure_finite(field: &str, value: f64) -> SustainResult<()> {
    if !value.is_finite() {
        return Err(SustainError::InvalidInput {
            field: field.into(),
            reason: format!("Value must be a finite number, got {value}"),
        });
    }
    Ok(())
}

/// Reject calendar years outside `MIN_YEAR..=MAX_YEAR`. Together with
/// `ensure_span` this keeps every `year + offset` inside `i32`.
pub(crate) fn ensure_year(field: &str, year: i32) -> SustainResult<()> {
    if !(MIN_YEAR..=MAX_YEAR).contains(&year) {
        return Err(SustainError::InvalidInput {
            field: field.into(),
            reason: format!("Year must be between {MIN_YEAR} and {MAX_YEAR}, got {year}"),
        });
    }
    Ok(())
}

/// Require a span of `1..=MAX_SPAN_YEARS` years.
pub(crate) fn ensure_span(field: &str, years: u32) -> SustainResult<()> {
    if years == 0 || years > MAX_SPAN_YEARS {
        return Err(SustainError::InvalidInput {
            field: field.into(),
            reason: format!("Must span between 1 and {MAX_SPAN_YEARS} years, got {years}"),
        });
    }
    Ok(())
}

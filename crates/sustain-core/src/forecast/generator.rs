use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Instant;

use crate::error::SustainError;
use crate::forecast::policy::{ForecastPolicy, PolicySet};
use crate::statement::derive::{derive, statement_warnings, DerivedStatement};
use crate::statement::record::{validate_series, FinancialYearRecord, LineItem};
use crate::types::{ensure_finite, with_metadata, ComputationOutput, Money, Percent, MAX_SPAN_YEARS};
use crate::SustainResult;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Number of trailing history entries averaged by `ForecastPolicy::Average`.
const AVERAGE_WINDOW: usize = 3;

const MAX_MULTIPLIER_PERCENT: Percent = 100.0;

// ---------------------------------------------------------------------------
// Input / output
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForecastInput {
    /// Audited years, oldest first. The last one is the forecast base.
    pub history: Vec<FinancialYearRecord>,
    /// Policy per line-item label. Lines without one carry forward.
    #[serde(default)]
    pub policies: BTreeMap<String, ForecastPolicy>,
    /// Growth percentage (0-100) applied to every `Multiplier` line.
    #[serde(default)]
    pub multiplier_percent: Percent,
    /// Number of years to project. Zero or negative yields no years.
    pub horizon_years: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForecastOutput {
    pub audited: Vec<DerivedStatement>,
    pub forecast: Vec<DerivedStatement>,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Project `horizon_years` statements forward from a single base year.
pub fn forecast(
    base: &DerivedStatement,
    policies: &PolicySet,
    multiplier_percent: Percent,
    horizon_years: i32,
) -> Vec<DerivedStatement> {
    forecast_from_history(
        std::slice::from_ref(base),
        policies,
        multiplier_percent,
        horizon_years,
    )
}

/// Project forward from a history of statements, oldest first.
///
/// Each projected year is derived and appended to the history before the
/// next one is computed, so `Average` lines see earlier forecast years.
pub fn forecast_from_history(
    history: &[DerivedStatement],
    policies: &PolicySet,
    multiplier_percent: Percent,
    horizon_years: i32,
) -> Vec<DerivedStatement> {
    if horizon_years <= 0 || history.is_empty() {
        return Vec::new();
    }

    let growth = 1.0 + multiplier_percent / 100.0;
    let seeded = history.len();

    // Projection stops at i32::MAX; later years have no calendar year.
    let buffer = (0..horizon_years).fold(history.to_vec(), |mut buffer, _| {
        if let Some(next) = project_year(&buffer, policies, growth) {
            tracing::trace!(year = next.year, "projected year");
            buffer.push(derive(&next));
        }
        buffer
    });

    buffer.into_iter().skip(seeded).collect()
}

/// Validate a forecast request and run it.
pub fn build_forecast(input: &ForecastInput) -> SustainResult<ComputationOutput<ForecastOutput>> {
    let start = Instant::now();

    if input.history.is_empty() {
        return Err(SustainError::InsufficientData(
            "At least one audited year is required to forecast".into(),
        ));
    }
    validate_series(&input.history)?;
    ensure_finite("multiplier_percent", input.multiplier_percent)?;
    if !(0.0..=MAX_MULTIPLIER_PERCENT).contains(&input.multiplier_percent) {
        return Err(SustainError::invalid(
            "multiplier_percent",
            format!(
                "Multiplier must be between 0 and 100, got {}",
                input.multiplier_percent
            ),
        ));
    }

    if input.horizon_years > MAX_SPAN_YEARS as i32 {
        return Err(SustainError::invalid(
            "horizon_years",
            format!(
                "Cannot forecast more than {MAX_SPAN_YEARS} years, got {}",
                input.horizon_years
            ),
        ));
    }

    let (policies, mut warnings) = PolicySet::from_labels(&input.policies)?;
    tracing::debug!(
        audited_years = input.history.len(),
        horizon_years = input.horizon_years,
        policies = policies.len(),
        "building forecast"
    );

    let audited: Vec<DerivedStatement> = input.history.iter().map(derive).collect();
    warnings.extend(statement_warnings(&audited));
    if input.horizon_years <= 0 {
        warnings.push(format!(
            "Horizon of {} years produces no forecast years",
            input.horizon_years
        ));
    }

    let forecast = forecast_from_history(
        &audited,
        &policies,
        input.multiplier_percent,
        input.horizon_years,
    );

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Line-item forecast (trailing 3-period average or compounding multiplier), re-derived each year",
        input,
        warnings,
        elapsed,
        ForecastOutput { audited, forecast },
    ))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn project_year(
    history: &[DerivedStatement],
    policies: &PolicySet,
    growth: f64,
) -> Option<FinancialYearRecord> {
    let prior = &history[history.len() - 1].record;
    let window = &history[history.len().saturating_sub(AVERAGE_WINDOW)..];

    let mut next = prior.clone();
    next.year = prior.year.checked_add(1)?;

    for item in LineItem::ALL {
        let value = match policies.get(item) {
            Some(ForecastPolicy::Multiplier) => prior.get(item) * growth,
            Some(ForecastPolicy::Average) => trailing_mean(window, item),
            None => prior.get(item),
        };
        next.set(item, value);
    }

    Some(next)
}

fn trailing_mean(window: &[DerivedStatement], item: LineItem) -> Money {
    let sum: Money = window.iter().map(|s| s.record.get(item)).sum();
    sum / window.len() as f64
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

use serde::{Deserialize, Serialize};

use crate::stress::compounding::compounded_value;
use crate::stress::{StressModel, StressResultSeries};
use crate::types::{ensure_finite, ensure_year, Money, Percent};
use crate::SustainResult;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScenarioEvent {
    pub year: i32,
    pub amount: Money,
}

/// One-time expense events.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OneTimeEventParams {
    /// Return the spent money would have earned, percent per year.
    pub annual_rate: Percent,
    #[serde(default)]
    pub events: Vec<ScenarioEvent>,
}

impl OneTimeEventParams {
    pub fn validate(&self) -> SustainResult<()> {
        ensure_finite("annual_rate", self.annual_rate)?;
        for (i, event) in self.events.iter().enumerate() {
            ensure_year(&format!("events[{i}].year"), event.year)?;
            ensure_finite(&format!("events[{i}].amount"), event.amount)?;
        }
        Ok(())
    }
}

/// Stress is the amount spent in the year. The residual in year `y` sums the
/// compounded value of every earlier event, principal included.
pub fn calculate(params: &OneTimeEventParams, years: &[i32]) -> StressResultSeries {
    let mut series = StressResultSeries::zeroed(StressModel::OneTimeEvent, years);

    for (i, &year) in years.iter().enumerate() {
        series.stress[i] = params
            .events
            .iter()
            .filter(|e| e.year == year)
            .map(|e| e.amount)
            .sum();

        series.residual[i] = params
            .events
            .iter()
            .filter(|e| e.year < year)
            .map(|e| compounded_value(e.amount, params.annual_rate, years_between(e.year, year)))
            .sum();
    }
    series
}

/// Whole years from `from` to `to`, saturating at `i32::MAX`.
fn years_between(from: i32, to: i32) -> i32 {
    i32::try_from(i64::from(to) - i64::from(from)).unwrap_or(i32::MAX)
}

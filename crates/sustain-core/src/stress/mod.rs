//! Stress-test models.
//!
//! Each model turns its scenario parameters and a display horizon into two
//! parallel series: the direct "stress" impact for each year and the
//! cumulative "residual" (lost earnings) impact. Years outside a scenario's
//! effective range are zero.

pub mod bond_inflation;
pub mod compounding;
pub mod expense_increase;
pub mod one_time_event;
pub mod return_drop;
pub mod revenue_drop;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Instant;

use crate::types::{ensure_span, ensure_year, with_metadata, ComputationOutput, Money};
use crate::SustainResult;

pub use bond_inflation::{BondInflationParams, Contribution};
pub use expense_increase::ExpenseIncreaseParams;
pub use one_time_event::{OneTimeEventParams, ScenarioEvent};
pub use return_drop::ReturnDropParams;
pub use revenue_drop::RevenueDropParams;

// ---------------------------------------------------------------------------
// Horizon
// ---------------------------------------------------------------------------

/// The consecutive years a caller wants to see, independent of any
/// scenario's own term.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayHorizon {
    #[serde(alias = "startYear")]
    pub start_year: i32,
    #[serde(alias = "numberOfYears")]
    pub number_of_years: u32,
}

impl DisplayHorizon {
    pub fn new(start_year: i32, number_of_years: u32) -> Self {
        DisplayHorizon {
            start_year,
            number_of_years,
        }
    }

    /// Horizon starting at the first forecast year after `last_audited_year`.
    pub fn following(last_audited_year: i32, number_of_years: u32) -> Self {
        DisplayHorizon::new(last_audited_year.saturating_add(1), number_of_years)
    }

    /// The displayed years. Stops short rather than wrapping past `i32::MAX`.
    pub fn years(&self) -> Vec<i32> {
        (0..self.number_of_years)
            .map_while(|i| i32::try_from(i64::from(self.start_year) + i64::from(i)).ok())
            .collect()
    }

    pub fn validate(&self) -> SustainResult<()> {
        ensure_year("horizon.start_year", self.start_year)?;
        ensure_span("horizon.number_of_years", self.number_of_years)
    }
}

// ---------------------------------------------------------------------------
// Models and scenarios
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StressModel {
    ReturnDrop,
    RevenueDrop,
    OneTimeEvent,
    ExpenseIncrease,
    BondInflation,
}

impl StressModel {
    pub const ALL: [StressModel; 5] = [
        StressModel::ReturnDrop,
        StressModel::RevenueDrop,
        StressModel::OneTimeEvent,
        StressModel::ExpenseIncrease,
        StressModel::BondInflation,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            StressModel::ReturnDrop => "return_drop",
            StressModel::RevenueDrop => "revenue_drop",
            StressModel::OneTimeEvent => "one_time_event",
            StressModel::ExpenseIncrease => "expense_increase",
            StressModel::BondInflation => "bond_inflation",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            StressModel::ReturnDrop => "Investment return drop",
            StressModel::RevenueDrop => "Revenue drop",
            StressModel::OneTimeEvent => "One-time expense events",
            StressModel::ExpenseIncrease => "Expense increase",
            StressModel::BondInflation => "Bond return vs inflation",
        }
    }
}

impl fmt::Display for StressModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parameters for any one of the five models.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "model", rename_all = "snake_case")]
pub enum StressScenario {
    ReturnDrop(ReturnDropParams),
    RevenueDrop(RevenueDropParams),
    OneTimeEvent(OneTimeEventParams),
    ExpenseIncrease(ExpenseIncreaseParams),
    BondInflation(BondInflationParams),
}

impl StressScenario {
    pub fn model(&self) -> StressModel {
        match self {
            StressScenario::ReturnDrop(_) => StressModel::ReturnDrop,
            StressScenario::RevenueDrop(_) => StressModel::RevenueDrop,
            StressScenario::OneTimeEvent(_) => StressModel::OneTimeEvent,
            StressScenario::ExpenseIncrease(_) => StressModel::ExpenseIncrease,
            StressScenario::BondInflation(_) => StressModel::BondInflation,
        }
    }

    pub fn validate(&self) -> SustainResult<()> {
        match self {
            StressScenario::ReturnDrop(p) => p.validate(),
            StressScenario::RevenueDrop(p) => p.validate(),
            StressScenario::OneTimeEvent(p) => p.validate(),
            StressScenario::ExpenseIncrease(p) => p.validate(),
            StressScenario::BondInflation(p) => p.validate(),
        }
    }

    /// Run the model over `years`. Assumes `validate` has passed.
    pub fn calculate(&self, years: &[i32]) -> StressResultSeries {
        match self {
            StressScenario::ReturnDrop(p) => return_drop::calculate(p, years),
            StressScenario::RevenueDrop(p) => revenue_drop::calculate(p, years),
            StressScenario::OneTimeEvent(p) => one_time_event::calculate(p, years),
            StressScenario::ExpenseIncrease(p) => expense_increase::calculate(p, years),
            StressScenario::BondInflation(p) => bond_inflation::calculate(p, years),
        }
    }
}

// ---------------------------------------------------------------------------
// Result series
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StressResultSeries {
    pub model: StressModel,
    pub years: Vec<i32>,
    pub stress: Vec<Money>,
    pub residual: Vec<Money>,
    /// Year-end balances, for models that track one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub balances: Option<Vec<Money>>,
}

/// One displayed year of a series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StressRow {
    pub year: i32,
    pub stress: Money,
    pub residual: Money,
}

impl StressResultSeries {
    /// A zero-filled series over `years`.
    pub fn zeroed(model: StressModel, years: &[i32]) -> Self {
        StressResultSeries {
            model,
            years: years.to_vec(),
            stress: vec![0.0; years.len()],
            residual: vec![0.0; years.len()],
            balances: None,
        }
    }

    pub fn len(&self) -> usize {
        self.years.len()
    }

    pub fn is_empty(&self) -> bool {
        self.years.is_empty()
    }

    fn index_of(&self, year: i32) -> Option<usize> {
        self.years.iter().position(|y| *y == year)
    }

    pub fn stress_at(&self, year: i32) -> Option<Money> {
        self.index_of(year).map(|i| self.stress[i])
    }

    pub fn residual_at(&self, year: i32) -> Option<Money> {
        self.index_of(year).map(|i| self.residual[i])
    }

    pub fn total_stress(&self) -> Money {
        self.stress.iter().sum()
    }

    pub fn final_residual(&self) -> Money {
        self.residual.last().copied().unwrap_or(0.0)
    }

    pub fn rows(&self) -> Vec<StressRow> {
        self.years
            .iter()
            .zip(self.stress.iter().zip(self.residual.iter()))
            .map(|(&year, (&stress, &residual))| StressRow {
                year,
                stress,
                residual,
            })
            .collect()
    }
}

/// Leading scenario years needed to reach the last displayed year, capped
/// at `term`. Zero when every displayed year precedes the scenario.
pub(crate) fn simulated_span(start_year: i32, term: u32, years: &[i32]) -> u32 {
    let last_offset = years
        .iter()
        .map(|&year| i64::from(year) - i64::from(start_year))
        .max();
    match last_offset {
        Some(offset) if offset >= 0 => u32::try_from(offset + 1).map_or(term, |n| n.min(term)),
        _ => 0,
    }
}

// ---------------------------------------------------------------------------
// Validated entry points
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StressTestInput {
    pub scenario: StressScenario,
    pub horizon: DisplayHorizon,
}

/// Validate a scenario and horizon, then run the scenario's model.
pub fn run_stress_test(
    input: &StressTestInput,
) -> SustainResult<ComputationOutput<StressResultSeries>> {
    let start = Instant::now();
    input.horizon.validate()?;
    input.scenario.validate()?;

    let model = input.scenario.model();
    tracing::debug!(
        %model,
        start_year = input.horizon.start_year,
        years = input.horizon.number_of_years,
        "running stress test"
    );

    let series = input.scenario.calculate(&input.horizon.years());
    let warnings = series_warnings(&series);

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        model.description(),
        input,
        warnings,
        elapsed,
        series,
    ))
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StressSuiteInput {
    pub scenarios: Vec<StressScenario>,
    pub horizon: DisplayHorizon,
}

/// Outcome for one scenario of a suite. Exactly one of `series` and `error` is set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuiteEntry {
    pub model: StressModel,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub series: Option<StressResultSeries>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Run several scenarios over one horizon. A rejected scenario is reported
/// in its own entry and does not stop the rest.
pub fn run_stress_suite(
    input: &StressSuiteInput,
) -> SustainResult<ComputationOutput<Vec<SuiteEntry>>> {
    let start = Instant::now();
    input.horizon.validate()?;
    tracing::debug!(
        scenarios = input.scenarios.len(),
        years = input.horizon.number_of_years,
        "running stress suite"
    );

    let years = input.horizon.years();
    let mut warnings = Vec::new();
    let entries: Vec<SuiteEntry> = input
        .scenarios
        .iter()
        .enumerate()
        .map(|(i, scenario)| {
            let model = scenario.model();
            match scenario.validate() {
                Ok(()) => {
                    let series = scenario.calculate(&years);
                    warnings.extend(
                        series_warnings(&series)
                            .into_iter()
                            .map(|w| format!("Scenario {i} ({model}): {w}")),
                    );
                    SuiteEntry {
                        model,
                        series: Some(series),
                        error: None,
                    }
                }
                Err(e) => {
                    warnings.push(format!("Scenario {i} ({model}) rejected: {e}"));
                    SuiteEntry {
                        model,
                        series: None,
                        error: Some(e.to_string()),
                    }
                }
            }
        })
        .collect();

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Independent stress scenarios over a shared display horizon",
        input,
        warnings,
        elapsed,
        entries,
    ))
}

fn series_warnings(series: &StressResultSeries) -> Vec<String> {
    let mut warnings = Vec::new();
    if series.stress.iter().chain(series.residual.iter()).any(|v| !v.is_finite()) {
        warnings.push("Non-finite values in result series".to_string());
    }
    if series.stress.iter().all(|v| *v == 0.0) {
        warnings.push("Scenario has no effect inside the display horizon".to_string());
    }
    warnings
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{MAX_SPAN_YEARS, MAX_YEAR};

    fn horizon() -> DisplayHorizon {
        DisplayHorizon::new(2025, 5)
    }

    #[test]
    fn test_horizon_years() {
        assert_eq!(horizon().years(), vec![2025, 2026, 2027, 2028, 2029]);
        assert_eq!(DisplayHorizon::following(2024, 2).years(), vec![2025, 2026]);
        assert!(DisplayHorizon::new(2025, 0).validate().is_err());
    }

    #[test]
    fn test_horizon_at_integer_extremes() {
        assert!(DisplayHorizon::new(i32::MAX, 2).validate().is_err());
        assert!(DisplayHorizon::new(i32::MIN, 2).validate().is_err());
        assert!(DisplayHorizon::new(2025, u32::MAX).validate().is_err());
        assert!(DisplayHorizon::following(i32::MAX, 1).validate().is_err());
        // Unvalidated horizons never wrap
        assert_eq!(DisplayHorizon::new(i32::MAX, 3).years(), vec![i32::MAX]);
        assert_eq!(DisplayHorizon::new(MAX_YEAR, MAX_SPAN_YEARS).years().len(), 1_000);
    }

    #[test]
    fn test_horizon_accepts_camel_case() {
        let h: DisplayHorizon =
            serde_json::from_str(r#"{"startYear": 2030, "numberOfYears": 3}"#).unwrap();
        assert_eq!(h, DisplayHorizon::new(2030, 3));
    }

    #[test]
    fn test_scenario_tagged_serde() {
        let json = r#"{
            "model": "expense_increase",
            "initial_expense": 1000.0,
            "increase_rate": 10.0,
            "return_rate": 5.0
        }"#;
        let s: StressScenario = serde_json::from_str(json).unwrap();
        assert_eq!(s.model(), StressModel::ExpenseIncrease);
    }

    #[test]
    fn test_run_stress_test_lengths_match() {
        let input = StressTestInput {
            scenario: StressScenario::ExpenseIncrease(ExpenseIncreaseParams {
                initial_expense: 10_000.0,
                increase_rate: 5.0,
                return_rate: 6.0,
            }),
            horizon: horizon(),
        };
        let out = run_stress_test(&input).unwrap();
        assert_eq!(out.result.len(), 5);
        assert_eq!(out.result.stress.len(), out.result.residual.len());
        assert_eq!(out.methodology, "Expense increase");
    }

    #[test]
    fn test_run_stress_test_rejects_bad_horizon() {
        let input = StressTestInput {
            scenario: StressScenario::ExpenseIncrease(ExpenseIncreaseParams {
                initial_expense: 1.0,
                increase_rate: 1.0,
                return_rate: 1.0,
            }),
            horizon: DisplayHorizon::new(2025, 0),
        };
        assert!(run_stress_test(&input).is_err());
    }

    #[test]
    fn test_suite_isolates_bad_scenario() {
        let input = StressSuiteInput {
            scenarios: vec![
                StressScenario::ExpenseIncrease(ExpenseIncreaseParams {
                    initial_expense: f64::NAN,
                    increase_rate: 1.0,
                    return_rate: 1.0,
                }),
                StressScenario::OneTimeEvent(OneTimeEventParams {
                    annual_rate: 5.0,
                    events: vec![ScenarioEvent {
                        year: 2026,
                        amount: 1_000.0,
                    }],
                }),
            ],
            horizon: horizon(),
        };
        let out = run_stress_suite(&input).unwrap();
        assert_eq!(out.result.len(), 2);
        assert!(out.result[0].error.is_some());
        assert!(out.result[0].series.is_none());
        let series = out.result[1].series.as_ref().unwrap();
        assert_eq!(series.stress_at(2026), Some(1_000.0));
        assert!(out.warnings.iter().any(|w| w.contains("rejected")));
    }

    #[test]
    fn test_suite_survives_extreme_years() {
        let input = StressSuiteInput {
            scenarios: vec![
                StressScenario::BondInflation(BondInflationParams {
                    present_value: 1_000.0,
                    interest_rate: 3.0,
                    term: 5,
                    fully_funded: false,
                    contributions: vec![],
                    start_year: Some(i32::MAX - 1),
                }),
                StressScenario::RevenueDrop(RevenueDropParams {
                    base_revenue: 1_000.0,
                    growth_rate: 0.0,
                    start_year: 2025,
                    total_years: u32::MAX,
                    initial_drop_percent: 10.0,
                }),
                StressScenario::OneTimeEvent(OneTimeEventParams {
                    annual_rate: 5.0,
                    events: vec![ScenarioEvent {
                        year: i32::MIN,
                        amount: 1_000.0,
                    }],
                }),
                StressScenario::ExpenseIncrease(ExpenseIncreaseParams {
                    initial_expense: 1_000.0,
                    increase_rate: 10.0,
                    return_rate: 0.0,
                }),
            ],
            horizon: horizon(),
        };
        let out = run_stress_suite(&input).unwrap();
        assert!(out.result[..3].iter().all(|e| e.error.is_some()));
        assert_eq!(out.result[3].series.as_ref().unwrap().stress, vec![100.0; 5]);
    }

    #[test]
    fn test_run_stress_test_rejects_overflowing_horizon() {
        let scenario = StressScenario::ExpenseIncrease(ExpenseIncreaseParams {
            initial_expense: 1.0,
            increase_rate: 1.0,
            return_rate: 1.0,
        });
        for horizon in [DisplayHorizon::new(i32::MAX, 2), DisplayHorizon::new(2025, u32::MAX)] {
            let input = StressTestInput {
                scenario: scenario.clone(),
                horizon,
            };
            assert!(matches!(
                run_stress_test(&input),
                Err(crate::SustainError::InvalidInput { .. })
            ));
        }
    }

    #[test]
    fn test_simulated_span() {
        assert_eq!(simulated_span(2025, 30, &[2025, 2026, 2027]), 3);
        assert_eq!(simulated_span(2025, 2, &[2025, 2026, 2027]), 2);
        assert_eq!(simulated_span(2030, 5, &[2025, 2026]), 0);
        assert_eq!(simulated_span(2025, 5, &[]), 0);
        assert_eq!(simulated_span(i32::MIN, u32::MAX, &[i32::MAX]), u32::MAX);
    }

    #[test]
    fn test_series_accessors() {
        let mut s = StressResultSeries::zeroed(StressModel::RevenueDrop, &[2025, 2026]);
        s.stress = vec![-10.0, -20.0];
        s.residual = vec![-10.0, -30.0];
        assert_eq!(s.total_stress(), -30.0);
        assert_eq!(s.final_residual(), -30.0);
        assert_eq!(s.stress_at(2027), None);
        assert_eq!(s.rows()[1].residual, -30.0);
    }

    #[test]
    fn test_model_display() {
        assert_eq!(StressModel::BondInflation.to_string(), "bond_inflation");
        assert_eq!(StressModel::ALL.len(), 5);
    }
}

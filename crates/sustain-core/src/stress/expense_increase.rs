use serde::{Deserialize, Serialize};

use crate::stress::{StressModel, StressResultSeries};
use crate::types::{ensure_finite, Money, Percent};
use crate::SustainResult;

/// A permanent increase in an expense line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpenseIncreaseParams {
    pub initial_expense: Money,
    /// Increase over the initial expense, percent.
    pub increase_rate: Percent,
    /// Return the extra spending would have earned, percent per year.
    pub return_rate: Percent,
}

impl ExpenseIncreaseParams {
    pub fn validate(&self) -> SustainResult<()> {
        ensure_finite("initial_expense", self.initial_expense)?;
        ensure_finite("increase_rate", self.increase_rate)?;
        ensure_finite("return_rate", self.return_rate)?;
        Ok(())
    }

    /// The yearly increase. Constant, not compounded.
    pub fn annual_increase(&self) -> Money {
        self.initial_expense * self.increase_rate / 100.0
    }
}

/// The residual of the `i`th displayed year (zero-based) is the growth the
/// increase would have earned over `i + 1` years.
pub fn calculate(params: &ExpenseIncreaseParams, years: &[i32]) -> StressResultSeries {
    let mut series = StressResultSeries::zeroed(StressModel::ExpenseIncrease, years);
    let increase = params.annual_increase();
    let growth = 1.0 + params.return_rate / 100.0;

    for i in 0..years.len() {
        let periods = i32::try_from(i + 1).unwrap_or(i32::MAX);
        series.stress[i] = increase;
        series.residual[i] = increase * (growth.powi(periods) - 1.0);
    }
    series
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params() -> ExpenseIncreaseParams {
        ExpenseIncreaseParams {
            initial_expense: 200_000.0,
            increase_rate: 5.0,
            return_rate: 10.0,
        }
    }

    #[test]
    fn test_stress_is_constant() {
        let s = calculate(&params(), &[2025, 2026, 2027, 2028]);
        assert!(s.stress.iter().all(|v| *v == 10_000.0));
    }

    #[test]
    fn test_residual_grows_with_index() {
        let s = calculate(&params(), &[2025, 2026, 2027]);
        assert!((s.residual[0] - 1_000.0).abs() < 1e-9);
        assert!((s.residual[1] - 2_100.0).abs() < 1e-9);
        assert!((s.residual[2] - 3_310.0).abs() < 1e-9);
    }

    #[test]
    fn test_index_is_relative_to_display_window() {
        let early = calculate(&params(), &[2025, 2026]);
        let late = calculate(&params(), &[2040, 2041]);
        assert_eq!(early.residual, late.residual);
    }

    #[test]
    fn test_zero_return_means_no_residual() {
        let mut p = params();
        p.return_rate = 0.0;
        let s = calculate(&p, &[2025, 2026]);
        assert_eq!(s.residual, vec![0.0, 0.0]);
    }

    #[test]
    fn test_validation() {
        let mut p = params();
        p.return_rate = f64::NEG_INFINITY;
        assert!(p.validate().is_err());
        assert!(params().validate().is_ok());
    }
}

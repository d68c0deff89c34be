use serde::{Deserialize, Serialize};

use crate::stress::compounding::{residual_effects, round_cents};
use crate::stress::{simulated_span, StressModel, StressResultSeries};
use crate::types::{ensure_finite, ensure_span, ensure_year, Money, Percent};
use crate::SustainResult;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Contribution {
    pub year: i32,
    pub contribution: Money,
}

/// Bond return against inflation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BondInflationParams {
    pub present_value: Money,
    /// Bond yield, percent per period.
    pub interest_rate: Percent,
    /// Periods (years) compounded.
    pub term: u32,
    /// Carried through to the output untouched; it does not change the arithmetic.
    #[serde(default)]
    pub fully_funded: bool,
    #[serde(default)]
    pub contributions: Vec<Contribution>,
    /// First calendar year of the term. Defaults to the first displayed year.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_year: Option<i32>,
}

impl BondInflationParams {
    pub fn validate(&self) -> SustainResult<()> {
        ensure_finite("present_value", self.present_value)?;
        ensure_finite("interest_rate", self.interest_rate)?;
        ensure_span("term", self.term)?;
        if let Some(year) = self.start_year {
            ensure_year("start_year", year)?;
        }
        for (i, c) in self.contributions.iter().enumerate() {
            ensure_year(&format!("contributions[{i}].year"), c.year)?;
            ensure_finite(&format!("contributions[{i}].contribution"), c.contribution)?;
        }
        Ok(())
    }

    /// Total contributed in `year`, zero if none listed.
    pub fn contribution_for(&self, year: i32) -> Money {
        self.contributions
            .iter()
            .filter(|c| c.year == year)
            .map(|c| c.contribution)
            .sum()
    }
}

/// Rounded balance at the end of each period of the term.
///
/// Every step is rounded to cents: the contribution is added, interest is
/// computed on the result, then credited.
pub fn period_balances(params: &BondInflationParams, start_year: i32) -> Vec<Money> {
    balances_over(params, start_year, params.term)
}

fn balances_over(params: &BondInflationParams, start_year: i32, periods: u32) -> Vec<Money> {
    let rate = params.interest_rate / 100.0;
    let mut balance = round_cents(params.present_value);

    (0..periods)
        .map(|k| {
            // Periods past i32::MAX have no calendar year and so no contribution
            let contribution = i32::try_from(i64::from(start_year) + i64::from(k))
                .map_or(0.0, |year| params.contribution_for(year));
            balance = round_cents(balance + contribution);
            let interest = round_cents(balance * rate);
            balance = round_cents(balance + interest);
            balance
        })
        .collect()
}

pub fn calculate(params: &BondInflationParams, years: &[i32]) -> StressResultSeries {
    let mut series = StressResultSeries::zeroed(StressModel::BondInflation, years);
    let Some(start_year) = params.start_year.or_else(|| years.first().copied()) else {
        return series;
    };

    let balances = balances_over(params, start_year, simulated_span(start_year, params.term, years));
    // Lost earnings measured against the bond's own rate on both sides, so
    // every period contributes exactly zero.
    let residual = residual_effects(&balances, params.interest_rate, params.interest_rate);

    let mut displayed_balances = vec![0.0; years.len()];
    for (i, &year) in years.iter().enumerate() {
        series.stress[i] = params.contribution_for(year);

        let offset = i64::from(year) - i64::from(start_year);
        if offset >= 0 && offset < balances.len() as i64 {
            series.residual[i] = residual[offset as usize];
            displayed_balances[i] = balances[offset as usize];
        }
    }
    series.balances = Some(displayed_balances);
    series
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params() -> BondInflationParams {
        BondInflationParams {
            present_value: 100_000.0,
            interest_rate: 3.5,
            term: 5,
            fully_funded: false,
            contributions: vec![
                Contribution {
                    year: 2026,
                    contribution: 10_000.0,
                },
                Contribution {
                    year: 2028,
                    contribution: 5_000.0,
                },
            ],
            start_year: Some(2025),
        }
    }

    #[test]
    fn test_balances_round_every_step() {
        let p = BondInflationParams {
            present_value: 1_000.0,
            interest_rate: 3.333,
            term: 2,
            fully_funded: true,
            contributions: vec![],
            start_year: Some(2025),
        };
        let b = period_balances(&p, 2025);
        // 1000 * 0.03333 = 33.33
        assert_eq!(b[0], 1_033.33);
        // 1033.33 * 0.03333 = 34.4409... -> 34.44
        assert_eq!(b[1], 1_067.77);
    }

    #[test]
    fn test_contributions_enter_before_interest() {
        let b = period_balances(&params(), 2025);
        assert_eq!(b[0], 103_500.0);
        // (103500 + 10000) * 1.035
        assert_eq!(b[1], 117_472.5);
    }

    #[test]
    fn test_stress_is_contribution_by_year() {
        let s = calculate(&params(), &[2025, 2026, 2027, 2028]);
        assert_eq!(s.stress, vec![0.0, 10_000.0, 0.0, 5_000.0]);
    }

    #[test]
    fn test_residual_is_known_zero() {
        // Lost earnings compare the bond rate with itself and are always zero.
        for rate in [-20.0, 0.0, 3.5, 12.0, 250.0] {
            let mut p = params();
            p.interest_rate = rate;
            let s = calculate(&p, &[2024, 2025, 2026, 2027, 2028, 2029, 2030, 2031]);
            assert!(s.residual.iter().all(|v| *v == 0.0), "rate {rate}");
        }
    }

    #[test]
    fn test_balances_zero_outside_term() {
        let s = calculate(&params(), &[2024, 2025, 2029, 2030]);
        let balances = s.balances.unwrap();
        assert_eq!(balances[0], 0.0);
        assert_eq!(balances[1], 103_500.0);
        assert!(balances[2] > 0.0);
        assert_eq!(balances[3], 0.0);
    }

    #[test]
    fn test_start_defaults_to_horizon() {
        let mut p = params();
        p.start_year = None;
        let s = calculate(&p, &[2026, 2027]);
        // Term starts in 2026, so the 2026 contribution lands in period 0.
        assert_eq!(s.balances.unwrap()[0], round_cents(110_000.0 * 1.035));
    }

    #[test]
    fn test_duplicate_contribution_years_sum() {
        let mut p = params();
        p.contributions.push(Contribution {
            year: 2026,
            contribution: 2_500.0,
        });
        assert_eq!(p.contribution_for(2026), 12_500.0);
    }

    #[test]
    fn test_validation() {
        let mut p = params();
        p.term = 0;
        assert!(p.validate().is_err());
        let mut p = params();
        p.contributions[0].contribution = f64::NAN;
        assert!(p.validate().is_err());
        let mut p = params();
        p.contributions[0].year = i32::MAX;
        assert!(p.validate().is_err());
        let mut p = params();
        p.term = u32::MAX;
        assert!(p.validate().is_err());
    }

    #[test]
    fn test_start_near_year_limit_does_not_overflow() {
        let mut p = params();
        p.start_year = Some(i32::MAX - 1);
        assert!(p.validate().is_err());
        let s = calculate(&p, &[i32::MAX - 1, i32::MAX]);
        let balances = s.balances.unwrap();
        assert_eq!(balances[0], 103_500.0);
        assert!(balances[1] > balances[0]);
        assert_eq!(period_balances(&p, i32::MAX - 1).len(), 5);
    }
}

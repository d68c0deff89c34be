use serde::{Deserialize, Serialize};

use crate::stress::{StressModel, StressResultSeries};
use crate::stress::simulated_span;
use crate::types::{ensure_finite, ensure_span, ensure_year, Money, Percent};
use crate::SustainResult;

const MONTHS_PER_YEAR: u32 = 12;

/// Investment-return-drop scenario.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReturnDropParams {
    pub present_value: Money,
    /// Annual nominal return, percent.
    pub interest_rate: Percent,
    /// Years simulated.
    pub term: u32,
    pub monthly_contribution: Money,
    /// Share of the return lost, percent. Above 100 makes the rate negative.
    pub drop_rate: Percent,
    /// First calendar year of the simulation. Defaults to the first displayed year.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_year: Option<i32>,
}

impl ReturnDropParams {
    pub fn validate(&self) -> SustainResult<()> {
        ensure_finite("present_value", self.present_value)?;
        ensure_finite("interest_rate", self.interest_rate)?;
        ensure_finite("monthly_contribution", self.monthly_contribution)?;
        ensure_finite("drop_rate", self.drop_rate)?;
        ensure_span("term", self.term)?;
        if let Some(year) = self.start_year {
            ensure_year("start_year", year)?;
        }
        Ok(())
    }
}

/// State of both accounts at the end of one simulated year.
#[derive(Debug, Clone, Copy)]
struct YearEnd {
    balance_gap: Money,
    cumulative_lost_interest: Money,
}

pub fn calculate(params: &ReturnDropParams, years: &[i32]) -> StressResultSeries {
    let mut series = StressResultSeries::zeroed(StressModel::ReturnDrop, years);
    let Some(start_year) = params.start_year.or_else(|| years.first().copied()) else {
        return series;
    };

    let simulated = simulate(params, simulated_span(start_year, params.term, years));
    for (i, year) in years.iter().enumerate() {
        let offset = i64::from(*year) - i64::from(start_year);
        if offset < 0 || offset >= simulated.len() as i64 {
            continue;
        }
        let end = simulated[offset as usize];
        series.stress[i] = end.balance_gap;
        series.residual[i] = end.cumulative_lost_interest;
    }
    series
}

/// Monthly compounding of the same account at the nominal and the dropped
/// rate over the first `years` years. Interest is credited before each
/// month's contribution.
fn simulate(params: &ReturnDropParams, years: u32) -> Vec<YearEnd> {
    let annual = params.interest_rate / 100.0;
    let nominal_monthly = annual / f64::from(MONTHS_PER_YEAR);
    let dropped_monthly = annual * (1.0 - params.drop_rate / 100.0) / f64::from(MONTHS_PER_YEAR);

    let mut no_drop = params.present_value;
    let mut with_drop = params.present_value;
    let mut lost = 0.0;
    let mut out = Vec::with_capacity(years as usize);

    for _ in 0..years {
        let mut earned_no_drop = 0.0;
        let mut earned_with_drop = 0.0;

        for _ in 0..MONTHS_PER_YEAR {
            let interest = no_drop * nominal_monthly;
            no_drop += interest + params.monthly_contribution;
            earned_no_drop += interest;

            let interest = with_drop * dropped_monthly;
            with_drop += interest + params.monthly_contribution;
            earned_with_drop += interest;
        }

        lost += earned_no_drop - earned_with_drop;
        out.push(YearEnd {
            balance_gap: no_drop - with_drop,
            cumulative_lost_interest: lost,
        });
    }

    out
}

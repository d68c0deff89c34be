use serde::{Deserialize, Serialize};

use crate::stress::{StressModel, StressResultSeries};
use crate::stress::simulated_span;
use crate::types::{ensure_finite, ensure_span, ensure_year, Money, Percent};
use crate::SustainResult;

/// Revenue-drop scenario.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RevenueDropParams {
    pub base_revenue: Money,
    /// Annual revenue growth as a decimal (0.03 = 3%).
    pub growth_rate: f64,
    pub start_year: i32,
    pub total_years: u32,
    /// Share of each year's revenue lost, percent.
    pub initial_drop_percent: Percent,
}

impl RevenueDropParams {
    pub fn validate(&self) -> SustainResult<()> {
        ensure_finite("base_revenue", self.base_revenue)?;
        ensure_finite("growth_rate", self.growth_rate)?;
        ensure_finite("initial_drop_percent", self.initial_drop_percent)?;
        ensure_year("start_year", self.start_year)?;
        ensure_span("total_years", self.total_years)
    }

    /// Signed revenue lost in scenario year `i` (zero-based).
    fn drop_in(&self, i: u32) -> Money {
        let revenue = self.base_revenue * (1.0 + self.growth_rate).powf(f64::from(i));
        -revenue * self.initial_drop_percent / 100.0
    }
}

pub fn calculate(params: &RevenueDropParams, years: &[i32]) -> StressResultSeries {
    let mut series = StressResultSeries::zeroed(StressModel::RevenueDrop, years);

    // Cumulative drops over the whole scenario, so residuals include years
    // before the display window.
    let mut cumulative = 0.0;
    let span = simulated_span(params.start_year, params.total_years, years);
    let by_year: Vec<(Money, Money)> = (0..span)
        .map(|i| {
            let drop = params.drop_in(i);
            cumulative += drop;
            (drop, cumulative)
        })
        .collect();

    for (idx, year) in years.iter().enumerate() {
        let offset = i64::from(*year) - i64::from(params.start_year);
        if offset < 0 || offset >= by_year.len() as i64 {
            continue;
        }
        let (drop, cumulative) = by_year[offset as usize];
        series.stress[idx] = drop;
        series.residual[idx] = cumulative;
    }
    series
}

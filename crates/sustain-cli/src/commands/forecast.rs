use std::collections::BTreeMap;

use clap::Args;
use serde::Deserialize;
use serde_json::Value;

use sustain_core::forecast::{build_forecast, ForecastInput, ForecastPolicy};
use sustain_core::records::{adapt_financial_years, StoredFinancialYear};

use crate::input;

/// Arguments for forecasting
#[derive(Args)]
pub struct ForecastArgs {
    /// Path to JSON or YAML forecast input
    #[arg(long)]
    pub input: Option<String>,
    /// Override the growth percentage applied to Multiplier lines
    #[arg(long)]
    pub multiplier: Option<f64>,
    /// Override the number of years to project
    #[arg(long)]
    pub years: Option<i32>,
}

/// Forecast input as stored: history rows may omit amounts.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ForecastFile {
    history: Vec<StoredFinancialYear>,
    #[serde(default)]
    policies: BTreeMap<String, ForecastPolicy>,
    #[serde(default, alias = "multiplier_percent")]
    multiplier_percent: f64,
    #[serde(default, alias = "horizon_years")]
    horizon_years: i32,
}

pub fn run_forecast(args: ForecastArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let file: ForecastFile = input::read_input(args.input.as_deref(), "forecast")?;
    let (history, adapter_warnings) = adapt_financial_years(&file.history);

    let forecast_input = ForecastInput {
        history,
        policies: file.policies,
        multiplier_percent: args.multiplier.unwrap_or(file.multiplier_percent),
        horizon_years: args.years.unwrap_or(file.horizon_years),
    };
    let mut out = build_forecast(&forecast_input)?;
    out.warnings.splice(0..0, adapter_warnings);
    Ok(serde_json::to_value(out)?)
}

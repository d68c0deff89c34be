use napi::Result as NapiResult;
use napi_derive::napi;

use sustain_core::records::{adapt_financial_years, MissingFields, ScenarioCatalog, StoredFinancialYear};
use sustain_core::stress::{DisplayHorizon, StressModel, StressTestInput};

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

fn parse_model(model: &str) -> NapiResult<StressModel> {
    StressModel::ALL
        .into_iter()
        .find(|m| m.as_str() == model)
        .ok_or_else(|| to_napi_error(format!("Unknown stress model '{model}'")))
}

// ---------------------------------------------------------------------------
// Statements and forecasts
// ---------------------------------------------------------------------------

/// Derive statements from stored audited years (camelCase, absent amounts zero).
#[napi]
pub fn derive_statements(years_json: String) -> NapiResult<String> {
    let stored: Vec<StoredFinancialYear> = serde_json::from_str(&years_json).map_err(to_napi_error)?;
    let (records, adapter_warnings) = adapt_financial_years(&stored);
    let mut output = sustain_core::statement::derive_statements(&records).map_err(to_napi_error)?;
    output.warnings.splice(0..0, adapter_warnings);
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn build_forecast(input_json: String) -> NapiResult<String> {
    let input: sustain_core::forecast::ForecastInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = sustain_core::forecast::build_forecast(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Stress tests
// ---------------------------------------------------------------------------

#[napi]
pub fn run_stress_test(input_json: String) -> NapiResult<String> {
    let input: StressTestInput = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = sustain_core::stress::run_stress_test(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn run_stress_suite(input_json: String) -> NapiResult<String> {
    let input: sustain_core::stress::StressSuiteInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = sustain_core::stress::run_stress_suite(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Saved scenarios
// ---------------------------------------------------------------------------

#[napi]
pub fn list_scenarios(catalog_json: String, model: String) -> NapiResult<String> {
    let catalog: ScenarioCatalog = serde_json::from_str(&catalog_json).map_err(to_napi_error)?;
    let summaries = catalog.list(parse_model(&model)?);
    serde_json::to_string(&summaries).map_err(to_napi_error)
}

/// Load a saved scenario and run it over `numberOfYears` from `startYear`.
#[napi]
pub fn run_saved_scenario(
    catalog_json: String,
    model: String,
    id: i64,
    start_year: i32,
    number_of_years: u32,
    zero_fill: Option<bool>,
) -> NapiResult<String> {
    let catalog: ScenarioCatalog = serde_json::from_str(&catalog_json).map_err(to_napi_error)?;
    let mode = if zero_fill.unwrap_or(false) {
        MissingFields::ZeroFill
    } else {
        MissingFields::Reject
    };
    let scenario = catalog
        .load(parse_model(&model)?, id, mode)
        .map_err(to_napi_error)?;
    let input = StressTestInput {
        scenario,
        horizon: DisplayHorizon::new(start_year, number_of_years),
    };
    let output = sustain_core::stress::run_stress_test(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Formatting
// ---------------------------------------------------------------------------

#[napi]
pub fn format_currency(value: f64) -> String {
    sustain_core::format::format_currency(value)
}

#[napi]
pub fn format_percent(fraction: f64) -> String {
    sustain_core::format::format_percent(fraction)
}

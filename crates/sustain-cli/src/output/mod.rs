pub mod csv_out;
pub mod json;
pub mod minimal;
pub mod table;

use serde_json::Value;

use sustain_core::forecast::ForecastOutput;
use sustain_core::statement::DerivedStatement;
use sustain_core::stress::{StressResultSeries, SuiteEntry};

use crate::OutputFormat;

/// Dispatch output to the appropriate formatter.
pub fn format_output(format: &OutputFormat, value: &Value) {
    match format {
        OutputFormat::Json => json::print_json(value),
        OutputFormat::Table => table::print_table(value),
        OutputFormat::Csv => csv_out::print_csv(value),
        OutputFormat::Minimal => minimal::print_minimal(value),
    }
}

/// The shapes of `result` the formatters know how to lay out by year.
pub(crate) enum Report {
    Statements(Vec<DerivedStatement>),
    Series(StressResultSeries),
    Suite(Vec<SuiteEntry>),
}

impl Report {
    /// Recognise a known result shape. Anything that does not round-trip
    /// (for instance a series holding non-finite values, which JSON carries
    /// as null) falls back to the generic layouts.
    pub(crate) fn from_result(result: &Value) -> Option<Report> {
        match result {
            Value::Object(map) if map.contains_key("audited") => {
                let out: ForecastOutput = serde_json::from_value(result.clone()).ok()?;
                let mut all = out.audited;
                all.extend(out.forecast);
                Some(Report::Statements(all))
            }
            Value::Object(map) if map.contains_key("residual") => {
                serde_json::from_value(result.clone()).ok().map(Report::Series)
            }
            Value::Array(items) if items.first().is_some_and(|i| i.get("net_income").is_some()) => {
                serde_json::from_value(result.clone()).ok().map(Report::Statements)
            }
            Value::Array(items) if items.first().is_some_and(|i| i.get("model").is_some()) => {
                serde_json::from_value(result.clone()).ok().map(Report::Suite)
            }
            _ => None,
        }
    }
}

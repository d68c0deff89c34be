use serde_json::Value;
use std::io;

use sustain_core::statement::{DerivedStatement, StatementValue};
use sustain_core::stress::StressResultSeries;

use super::Report;

/// Write output as CSV to stdout.
pub fn print_csv(value: &Value) {
    let stdout = io::stdout();
    let mut wtr = csv::Writer::from_writer(stdout.lock());

    let result = value.as_object().and_then(|m| m.get("result"));
    match result.and_then(Report::from_result) {
        Some(Report::Statements(statements)) => write_statements_csv(&mut wtr, &statements),
        Some(Report::Series(series)) => {
            let _ = wtr.write_record(["model", "year", "stress", "residual"]);
            write_series_rows(&mut wtr, &series);
        }
        Some(Report::Suite(entries)) => {
            let _ = wtr.write_record(["model", "year", "stress", "residual"]);
            for entry in entries.iter().filter_map(|e| e.series.as_ref()) {
                write_series_rows(&mut wtr, entry);
            }
        }
        None => match (value, result) {
            (_, Some(Value::Object(result))) => {
                let _ = wtr.write_record(["field", "value"]);
                for (key, val) in result {
                    let _ = wtr.write_record([key.as_str(), &format_csv_value(val)]);
                }
            }
            (_, Some(Value::Array(arr))) | (Value::Array(arr), None) => write_array_csv(&mut wtr, arr),
            (Value::Object(map), _) => {
                let _ = wtr.write_record(["field", "value"]);
                for (key, val) in map {
                    let _ = wtr.write_record([key.as_str(), &format_csv_value(val)]);
                }
            }
            _ => {
                let _ = wtr.write_record([&format_csv_value(value)]);
            }
        },
    }

    let _ = wtr.flush();
}

/// One row per year, one column per line label. Undefined ratios are empty.
fn write_statements_csv<W: io::Write>(wtr: &mut csv::Writer<W>, statements: &[DerivedStatement]) {
    let Some(first) = statements.first() else {
        return;
    };
    let mut header = vec!["Year"];
    header.extend(first.rows().iter().map(|r| r.label));
    let _ = wtr.write_record(&header);

    for s in statements {
        let mut row = vec![s.year().to_string()];
        row.extend(s.rows().iter().map(|r| match r.value {
            StatementValue::Amount(v) => v.to_string(),
            StatementValue::Ratio(ratio) => ratio.value().map(|v| v.to_string()).unwrap_or_default(),
        }));
        let _ = wtr.write_record(&row);
    }
}

fn write_series_rows<W: io::Write>(wtr: &mut csv::Writer<W>, series: &StressResultSeries) {
    for row in series.rows() {
        let _ = wtr.write_record([
            series.model.to_string(),
            row.year.to_string(),
            row.stress.to_string(),
            row.residual.to_string(),
        ]);
    }
}

fn write_array_csv<W: io::Write>(wtr: &mut csv::Writer<W>, arr: &[Value]) {
    if arr.is_empty() {
        return;
    }

    // Extract headers from first object
    if let Some(Value::Object(first)) = arr.first() {
        let headers: Vec<&str> = first.keys().map(|k| k.as_str()).collect();
        let _ = wtr.write_record(&headers);

        for item in arr {
            if let Value::Object(map) = item {
                let row: Vec<String> = headers
                    .iter()
                    .map(|h| map.get(*h).map(format_csv_value).unwrap_or_default())
                    .collect();
                let _ = wtr.write_record(&row);
            }
        }
    } else {
        for item in arr {
            let _ = wtr.write_record([&format_csv_value(item)]);
        }
    }
}

fn format_csv_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => String::new(),
        _ => serde_json::to_string(value).unwrap_or_default(),
    }
}

use serde_json::Value;

use sustain_core::format::format_currency;

use super::Report;

/// Print just the key answer value from the output.
///
/// Statements report the latest net income, stress series their final
/// residual. Anything else falls back to the first field of the result.
pub fn print_minimal(value: &Value) {
    let result_obj = value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value);

    match Report::from_result(result_obj) {
        Some(Report::Statements(statements)) => {
            if let Some(last) = statements.last() {
                println!("{}", format_currency(last.net_income));
            }
            return;
        }
        Some(Report::Series(series)) => {
            println!("{}", format_currency(series.final_residual()));
            return;
        }
        Some(Report::Suite(entries)) => {
            for entry in entries {
                let answer = match (&entry.series, &entry.error) {
                    (Some(series), _) => format_currency(series.final_residual()),
                    (None, Some(error)) => format!("error: {}", error),
                    (None, None) => String::new(),
                };
                println!("{}: {}", entry.model, answer);
            }
            return;
        }
        None => {}
    }

    let priority_keys = ["formatted", "value", "scenarios"];

    if let Value::Object(map) = result_obj {
        for key in &priority_keys {
            if let Some(val) = map.get(*key) {
                if !val.is_null() {
                    println!("{}", format_minimal(val));
                    return;
                }
            }
        }

        if let Some((key, val)) = map.iter().next() {
            println!("{}: {}", key, format_minimal(val));
            return;
        }
    }

    println!("{}", format_minimal(result_obj));
}

fn format_minimal(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "null".to_string(),
        _ => serde_json::to_string(value).unwrap_or_default(),
    }
}

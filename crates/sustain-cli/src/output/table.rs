use serde_json::Value;
use tabled::{builder::Builder, Table};

use sustain_core::format::{format_currency, format_ratio};
use sustain_core::statement::{DerivedStatement, StatementValue};
use sustain_core::stress::StressResultSeries;

use super::Report;

/// Format output as a table using the tabled crate.
pub fn print_table(value: &Value) {
    match value {
        Value::Object(map) => {
            // Check if "result" key holds the primary data
            if let Some(result) = map.get("result") {
                print_result_table(result, map);
            } else {
                print_flat_object(value);
            }
        }
        Value::Array(arr) => {
            print_array_table(arr);
        }
        _ => {
            println!("{}", value);
        }
    }
}

fn print_result_table(result: &Value, envelope: &serde_json::Map<String, Value>) {
    match Report::from_result(result) {
        Some(Report::Statements(statements)) => println!("{}", statement_table(&statements)),
        Some(Report::Series(series)) => println!("{}", series_table(&series)),
        Some(Report::Suite(entries)) => {
            for entry in entries {
                println!("{} ({})", entry.model.description(), entry.model);
                match (entry.series, entry.error) {
                    (Some(series), _) => println!("{}", series_table(&series)),
                    (None, Some(error)) => println!("  rejected: {}", error),
                    (None, None) => {}
                }
                println!();
            }
        }
        None => match result {
            Value::Object(_) => print_flat_object(result),
            Value::Array(arr) => print_array_table(arr),
            other => println!("{}", format_value(other)),
        },
    }

    // Print warnings if any
    if let Some(Value::Array(warnings)) = envelope.get("warnings") {
        if !warnings.is_empty() {
            println!("\nWarnings:");
            for w in warnings {
                if let Value::String(s) = w {
                    println!("  - {}", s);
                }
            }
        }
    }

    // Print methodology
    if let Some(Value::String(meth)) = envelope.get("methodology") {
        println!("\nMethodology: {}", meth);
    }
}

/// One row per line, one column per year.
pub(crate) fn statement_table(statements: &[DerivedStatement]) -> Table {
    let mut builder = Builder::default();
    let mut header = vec!["Line".to_string()];
    header.extend(statements.iter().map(|s| s.year().to_string()));
    builder.push_record(header);

    let columns: Vec<_> = statements.iter().map(|s| s.rows()).collect();
    if let Some(first) = columns.first() {
        for (i, row) in first.iter().enumerate() {
            let mut record = vec![row.label.to_string()];
            record.extend(columns.iter().map(|c| statement_cell(c[i].value)));
            builder.push_record(record);
        }
    }
    Table::from(builder)
}

pub(crate) fn series_table(series: &StressResultSeries) -> Table {
    let mut builder = Builder::default();
    builder.push_record(["Year", "Stress", "Residual"]);
    for row in series.rows() {
        builder.push_record([
            row.year.to_string(),
            format_currency(row.stress),
            format_currency(row.residual),
        ]);
    }
    Table::from(builder)
}

fn statement_cell(value: StatementValue) -> String {
    match value {
        StatementValue::Amount(v) => format_currency(v),
        StatementValue::Ratio(r) => format_ratio(r),
    }
}

fn print_flat_object(value: &Value) {
    if let Value::Object(map) = value {
        let mut builder = Builder::default();
        builder.push_record(["Field", "Value"]);
        for (key, val) in map {
            builder.push_record([key.as_str(), &format_value(val)]);
        }
        let table = Table::from(builder);
        println!("{}", table);
    }
}

fn print_array_table(arr: &[Value]) {
    if arr.is_empty() {
        println!("(empty)");
        return;
    }

    // Collect all keys from first object for headers
    if let Some(Value::Object(first)) = arr.first() {
        let headers: Vec<String> = first.keys().cloned().collect();
        let mut builder = Builder::default();
        builder.push_record(&headers);

        for item in arr {
            if let Value::Object(map) = item {
                let row: Vec<String> = headers
                    .iter()
                    .map(|h| map.get(h.as_str()).map(format_value).unwrap_or_default())
                    .collect();
                builder.push_record(row);
            }
        }

        let table = Table::from(builder);
        println!("{}", table);
    } else {
        for item in arr {
            println!("{}", format_value(item));
        }
    }
}

fn format_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "N/A".to_string(),
        Value::Array(arr) => {
            let items: Vec<String> = arr.iter().map(format_value).collect();
            items.join(", ")
        }
        Value::Object(_) => serde_json::to_string(value).unwrap_or_default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sustain_core::statement::{derive, FinancialYearRecord};
    use sustain_core::stress::StressModel;

    #[test]
    fn test_statement_table_has_label_rows_and_year_columns() {
        let mut a = FinancialYearRecord::empty(2023);
        a.revenue = 1_000.0;
        let mut b = FinancialYearRecord::empty(2024);
        b.revenue = 0.0;
        let rendered = statement_table(&[derive(&a), derive(&b)]).to_string();
        assert!(rendered.contains("2023"));
        assert!(rendered.contains("2024"));
        assert!(rendered.contains("Net Sales"));
        assert!(rendered.contains("$1,000.00"));
        // Zero net sales leaves ratios undefined
        assert!(rendered.contains("N/A"));
    }

    #[test]
    fn test_series_table_formats_currency() {
        let mut series = StressResultSeries::zeroed(StressModel::ExpenseIncrease, &[2030, 2031]);
        series.stress[0] = -1_234.567;
        series.residual[1] = f64::INFINITY;
        let rendered = series_table(&series).to_string();
        assert!(rendered.contains("-$1,234.57"));
        assert!(rendered.contains("Infinity"));
    }
}

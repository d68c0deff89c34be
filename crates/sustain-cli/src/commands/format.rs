use clap::{Args, ValueEnum};
use serde_json::{json, Value};

use sustain_core::format::{format_currency, format_percent, parse_currency};

/// Arguments for value formatting
#[derive(Args)]
pub struct FormatArgs {
    /// What kind of value to format
    #[arg(long, value_enum, default_value = "currency")]
    pub kind: FormatKind,
    /// The value (a number, or a display string for `parse`)
    #[arg(allow_hyphen_values = true)]
    pub value: String,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum FormatKind {
    /// `$1,234.57`
    Currency,
    /// A fraction shown as a percentage
    Percent,
    /// Read a formatted currency string back into a number
    Parse,
}

pub fn run_format(args: FormatArgs) -> Result<Value, Box<dyn std::error::Error>> {
    match args.kind {
        FormatKind::Parse => {
            let value = parse_currency(&args.value)
                .ok_or_else(|| format!("Not a currency value: '{}'", args.value))?;
            Ok(json!({ "value": value }))
        }
        kind => {
            let value: f64 = args
                .value
                .trim()
                .parse()
                .map_err(|e| format!("Not a number: '{}' ({})", args.value, e))?;
            let formatted = match kind {
                FormatKind::Percent => format_percent(value),
                _ => format_currency(value),
            };
            Ok(json!({ "formatted": formatted }))
        }
    }
}

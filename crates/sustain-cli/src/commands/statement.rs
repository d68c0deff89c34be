use clap::Args;
use serde_json::Value;

use sustain_core::records::{adapt_financial_years, StoredFinancialYear};
use sustain_core::statement::derive_statements;

use crate::input;

/// Arguments for statement derivation
#[derive(Args)]
pub struct DeriveArgs {
    /// Path to a JSON or YAML array of audited years (absent amounts count as zero)
    #[arg(long)]
    pub input: Option<String>,
}

pub fn run_derive(args: DeriveArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let stored: Vec<StoredFinancialYear> = input::read_input(args.input.as_deref(), "derive")?;
    let (records, adapter_warnings) = adapt_financial_years(&stored);

    let mut out = derive_statements(&records)?;
    out.warnings.splice(0..0, adapter_warnings);
    Ok(serde_json::to_value(out)?)
}

use clap::{Args, Subcommand, ValueEnum};
use serde_json::{json, Value};

use sustain_core::records::{MissingFields, ScenarioCatalog};
use sustain_core::stress::{self, StressModel, StressTestInput};

use crate::commands::stress::HorizonArgs;
use crate::input;

/// Arguments for saved-scenario commands
#[derive(Args)]
pub struct CatalogArgs {
    /// Path to the JSON or YAML scenario catalog
    #[arg(long)]
    pub input: Option<String>,
    #[command(subcommand)]
    pub action: CatalogAction,
}

#[derive(Subcommand)]
pub enum CatalogAction {
    /// List saved scenarios for one model
    List {
        #[arg(long, value_enum)]
        model: ModelArg,
    },
    /// Load a saved scenario and run it
    Run {
        #[arg(long, value_enum)]
        model: ModelArg,
        /// Scenario id within the model
        #[arg(long)]
        id: i64,
        #[command(flatten)]
        horizon: HorizonArgs,
        /// Treat absent stored values as zero instead of rejecting the record
        #[arg(long)]
        zero_fill: bool,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ModelArg {
    ReturnDrop,
    RevenueDrop,
    OneTimeEvent,
    ExpenseIncrease,
    BondInflation,
}

impl From<ModelArg> for StressModel {
    fn from(arg: ModelArg) -> Self {
        match arg {
            ModelArg::ReturnDrop => StressModel::ReturnDrop,
            ModelArg::RevenueDrop => StressModel::RevenueDrop,
            ModelArg::OneTimeEvent => StressModel::OneTimeEvent,
            ModelArg::ExpenseIncrease => StressModel::ExpenseIncrease,
            ModelArg::BondInflation => StressModel::BondInflation,
        }
    }
}

pub fn run_catalog(args: CatalogArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let catalog: ScenarioCatalog = input::read_input(args.input.as_deref(), "catalog")?;

    match args.action {
        CatalogAction::List { model } => {
            let model = StressModel::from(model);
            Ok(json!({
                "model": model,
                "description": model.description(),
                "scenarios": catalog.list(model),
            }))
        }
        CatalogAction::Run {
            model,
            id,
            horizon,
            zero_fill,
        } => {
            let mode = if zero_fill {
                MissingFields::ZeroFill
            } else {
                MissingFields::Reject
            };
            let scenario = catalog.load(model.into(), id, mode)?;
            let test_input = StressTestInput {
                scenario,
                horizon: horizon.resolve(None)?,
            };
            let result = stress::run_stress_test(&test_input)?;
            Ok(serde_json::to_value(result)?)
        }
    }
}

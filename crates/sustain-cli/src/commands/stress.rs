use clap::Args;
use serde::Deserialize;
use serde_json::Value;

use sustain_core::stress::{self, DisplayHorizon, StressScenario, StressSuiteInput, StressTestInput};

use crate::input;

/// Arguments for a single stress test
#[derive(Args)]
pub struct StressArgs {
    /// Path to JSON or YAML input: `{scenario, horizon}`
    #[arg(long)]
    pub input: Option<String>,
    #[command(flatten)]
    pub horizon: HorizonArgs,
}

/// Arguments for a stress-test suite
#[derive(Args)]
pub struct StressSuiteArgs {
    /// Path to JSON or YAML input: `{scenarios, horizon}`
    #[arg(long)]
    pub input: Option<String>,
    #[command(flatten)]
    pub horizon: HorizonArgs,
}

/// Display horizon overrides shared by the stress commands.
#[derive(Args)]
pub struct HorizonArgs {
    /// First displayed year
    #[arg(long)]
    pub start_year: Option<i32>,
    /// Number of displayed years
    #[arg(long)]
    pub years: Option<u32>,
}

impl HorizonArgs {
    /// Merge flags over whatever horizon the input file carried.
    pub fn resolve(&self, from_file: Option<DisplayHorizon>) -> Result<DisplayHorizon, Box<dyn std::error::Error>> {
        match (from_file, self.start_year, self.years) {
            (Some(h), start, years) => Ok(DisplayHorizon::new(
                start.unwrap_or(h.start_year),
                years.unwrap_or(h.number_of_years),
            )),
            (None, Some(start), Some(years)) => Ok(DisplayHorizon::new(start, years)),
            (None, _, _) => Err("a horizon is required: add one to the input or pass --start-year and --years".into()),
        }
    }
}

#[derive(Deserialize)]
struct StressFile {
    scenario: StressScenario,
    #[serde(default)]
    horizon: Option<DisplayHorizon>,
}

#[derive(Deserialize)]
struct SuiteFile {
    scenarios: Vec<StressScenario>,
    #[serde(default)]
    horizon: Option<DisplayHorizon>,
}

pub fn run_stress(args: StressArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let file: StressFile = input::read_input(args.input.as_deref(), "stress")?;
    let test_input = StressTestInput {
        scenario: file.scenario,
        horizon: args.horizon.resolve(file.horizon)?,
    };
    let result = stress::run_stress_test(&test_input)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_stress_suite(args: StressSuiteArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let file: SuiteFile = input::read_input(args.input.as_deref(), "stress-suite")?;
    let suite_input = StressSuiteInput {
        scenarios: file.scenarios,
        horizon: args.horizon.resolve(file.horizon)?,
    };
    let result = stress::run_stress_suite(&suite_input)?;
    Ok(serde_json::to_value(result)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flags(start_year: Option<i32>, years: Option<u32>) -> HorizonArgs {
        HorizonArgs { start_year, years }
    }

    #[test]
    fn test_flags_override_file_horizon() {
        let h = flags(Some(2030), None)
            .resolve(Some(DisplayHorizon::new(2025, 10)))
            .unwrap();
        assert_eq!(h, DisplayHorizon::new(2030, 10));
    }

    #[test]
    fn test_flags_alone_need_both_values() {
        assert!(flags(Some(2030), None).resolve(None).is_err());
        assert_eq!(
            flags(Some(2030), Some(3)).resolve(None).unwrap(),
            DisplayHorizon::new(2030, 3)
        );
    }
}

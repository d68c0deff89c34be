mod commands;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;
use tracing_subscriber::EnvFilter;

use commands::catalog::CatalogArgs;
use commands::format::FormatArgs;
use commands::forecast::ForecastArgs;
use commands::statement::DeriveArgs;
use commands::stress::{StressArgs, StressSuiteArgs};

/// Financial sustainability statements, forecasts and stress tests
#[derive(Parser)]
#[command(
    name = "sustain",
    version,
    about = "Financial sustainability statements, forecasts and stress tests",
    long_about = "Derives income statements and balance sheets from audited years, \
                  projects them forward under per-line forecast policies, and runs \
                  the five long-term stress-test models over a display horizon."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,
}

#[derive(Subcommand)]
enum Commands {
    /// Derive totals and ratios for a series of audited years
    Derive(DeriveArgs),
    /// Project audited years forward under forecast policies
    Forecast(ForecastArgs),
    /// Run one stress-test scenario
    Stress(StressArgs),
    /// Run several stress-test scenarios over one horizon
    StressSuite(StressSuiteArgs),
    /// List or run saved scenarios
    Catalog(CatalogArgs),
    /// Format a value for display
    Format(FormatArgs),
    /// Print version information
    Version,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Csv,
    Minimal,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Derive(args) => commands::statement::run_derive(args),
        Commands::Forecast(args) => commands::forecast::run_forecast(args),
        Commands::Stress(args) => commands::stress::run_stress(args),
        Commands::StressSuite(args) => commands::stress::run_stress_suite(args),
        Commands::Catalog(args) => commands::catalog::run_catalog(args),
        Commands::Format(args) => commands::format::run_format(args),
        Commands::Version => {
            println!("sustain {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => {
            tracing::debug!(error = %e, "command failed");
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}

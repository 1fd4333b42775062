mod commands;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;

use commands::budget::BudgetArgs;
use commands::compare::CompareArgs;
use commands::plan::PlanArgs;

/// Debt repayment planning with decimal precision
#[derive(Parser)]
#[command(
    name = "debtplan",
    version,
    about = "Debt repayment planning with decimal precision",
    long_about = "Builds month-by-month debt repayment schedules for a fixed monthly \
                  budget using the snowball (smallest balance first) or avalanche \
                  (highest rate first) strategy, compares the two, and totals \
                  income and expenses by category."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,

    /// Log engine decisions to stderr (RUST_LOG overrides)
    #[arg(long, short, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Build a month-by-month repayment schedule
    Plan(PlanArgs),
    /// Compare snowball and avalanche on the same debts
    Compare(CompareArgs),
    /// Total income and expenses by category
    Budget(BudgetArgs),
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
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Plan(args) => commands::plan::run_plan(args),
        Commands::Compare(args) => commands::compare::run_compare(args),
        Commands::Budget(args) => commands::budget::run_budget(args),
        Commands::Version => {
            println!("debtplan {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => {
            log::debug!("command failed: {e:?}");
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}

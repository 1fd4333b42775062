use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use debt_plan_core::comparison::{self, StrategyComparisonInput};

use crate::commands::plan::ScenarioArgs;
use crate::input;

/// Arguments for comparing repayment strategies
#[derive(Args)]
pub struct CompareArgs {
    /// Path to JSON or YAML input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    #[command(flatten)]
    pub scenario: ScenarioArgs,
}

pub fn run_compare(args: CompareArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let compare_input: StrategyComparisonInput = if let Some(ref path) = args.input {
        input::file::read_input(path)?
    } else if args.scenario.has_loans() {
        StrategyComparisonInput {
            income: args
                .scenario
                .income
                .ok_or("--income is required (or provide --input)")?,
            fixed_expenses: args.scenario.fixed_expenses.unwrap_or(Decimal::ZERO),
            loans: args.scenario.parse_loans()?,
            max_months: args.scenario.max_months,
            start_date: args.scenario.start_date,
        }
    } else if let Some(data) = input::stdin::read_stdin()? {
        serde_json::from_value(data)?
    } else {
        return Err("--loan NAME:BALANCE:RATE[:MINIMUM], --input <file> or stdin required for a strategy comparison".into());
    };

    let result = comparison::compare_strategies(&compare_input)?;
    Ok(serde_json::to_value(result)?)
}

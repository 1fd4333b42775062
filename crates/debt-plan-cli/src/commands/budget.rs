use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use debt_plan_core::budget::{self, BudgetEntry, BudgetInput, EntryKind};

use crate::input;

/// Arguments for the income / expense summary
#[derive(Args)]
pub struct BudgetArgs {
    /// Path to JSON or YAML input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Income line as CATEGORY:AMOUNT; repeatable
    #[arg(long = "income", value_name = "CATEGORY:AMOUNT")]
    pub incomes: Vec<String>,

    /// Expense line as CATEGORY:AMOUNT; repeatable
    #[arg(long = "expense", value_name = "CATEGORY:AMOUNT")]
    pub expenses: Vec<String>,
}

pub fn run_budget(args: BudgetArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let budget_input: BudgetInput = if let Some(ref path) = args.input {
        input::file::read_input(path)?
    } else if !args.incomes.is_empty() || !args.expenses.is_empty() {
        let incomes = args
            .incomes
            .iter()
            .map(|arg| parse_entry(arg, EntryKind::Income));
        let expenses = args
            .expenses
            .iter()
            .map(|arg| parse_entry(arg, EntryKind::Expense));
        BudgetInput {
            entries: incomes.chain(expenses).collect::<Result<Vec<_>, _>>()?,
            period: None,
        }
    } else if let Some(data) = input::stdin::read_stdin()? {
        serde_json::from_value(data)?
    } else {
        return Err("--income/--expense CATEGORY:AMOUNT, --input <file> or stdin required for a budget summary".into());
    };

    let result = budget::summarize_budget(&budget_input)?;
    Ok(serde_json::to_value(result)?)
}

fn parse_entry(arg: &str, kind: EntryKind) -> Result<BudgetEntry, Box<dyn std::error::Error>> {
    let (category, amount) = arg
        .rsplit_once(':')
        .ok_or_else(|| format!("Entry must be CATEGORY:AMOUNT, got '{}'", arg))?;
    let amount: Decimal = amount
        .trim()
        .parse()
        .map_err(|e| format!("Invalid amount in '{}': {}", arg, e))?;
    Ok(BudgetEntry {
        category: category.trim().to_string(),
        kind,
        amount,
        date: None,
    })
}

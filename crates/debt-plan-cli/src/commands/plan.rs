use chrono::NaiveDate;
use clap::{Args, ValueEnum};
use rust_decimal::Decimal;
use serde_json::Value;

use debt_plan_core::repayment::{self, LoanInput, RepaymentPlanInput, RepaymentStrategy};

use crate::input;

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum StrategyArg {
    /// Smallest balance first
    Snowball,
    /// Highest interest rate first
    Avalanche,
}

impl From<StrategyArg> for RepaymentStrategy {
    fn from(value: StrategyArg) -> Self {
        match value {
            StrategyArg::Snowball => RepaymentStrategy::Snowball,
            StrategyArg::Avalanche => RepaymentStrategy::Avalanche,
        }
    }
}

/// Income, expenses and loans given directly on the command line
#[derive(Args)]
pub struct ScenarioArgs {
    /// Monthly income
    #[arg(long)]
    pub income: Option<Decimal>,

    /// Monthly fixed living expenses
    #[arg(long, alias = "expenses")]
    pub fixed_expenses: Option<Decimal>,

    /// Loan as NAME:BALANCE:ANNUAL_RATE_PCT[:MINIMUM_PAYMENT]; repeat per loan
    #[arg(long = "loan", value_name = "LOAN")]
    pub loans: Vec<String>,

    /// Give up after this many months (default 1200)
    #[arg(long)]
    pub max_months: Option<u32>,

    /// Date of the first payment (YYYY-MM-DD)
    #[arg(long)]
    pub start_date: Option<NaiveDate>,
}

impl ScenarioArgs {
    pub fn has_loans(&self) -> bool {
        !self.loans.is_empty()
    }

    pub fn parse_loans(&self) -> Result<Vec<LoanInput>, Box<dyn std::error::Error>> {
        self.loans.iter().map(|arg| parse_loan_arg(arg)).collect()
    }
}

/// Arguments for building a repayment plan
#[derive(Args)]
pub struct PlanArgs {
    /// Path to JSON or YAML input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Repayment strategy (overrides the input file's strategy)
    #[arg(long, value_enum)]
    pub strategy: Option<StrategyArg>,

    #[command(flatten)]
    pub scenario: ScenarioArgs,
}

pub fn run_plan(args: PlanArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let mut plan_input: RepaymentPlanInput = if let Some(ref path) = args.input {
        input::file::read_input(path)?
    } else if args.scenario.has_loans() {
        RepaymentPlanInput {
            income: args
                .scenario
                .income
                .ok_or("--income is required (or provide --input)")?,
            fixed_expenses: args.scenario.fixed_expenses.unwrap_or(Decimal::ZERO),
            loans: args.scenario.parse_loans()?,
            strategy: RepaymentStrategy::default(),
            max_months: args.scenario.max_months,
            start_date: args.scenario.start_date,
        }
    } else if let Some(data) = input::stdin::read_stdin()? {
        serde_json::from_value(data)?
    } else {
        return Err("--loan NAME:BALANCE:RATE[:MINIMUM], --input <file> or stdin required for a repayment plan".into());
    };

    if let Some(strategy) = args.strategy {
        plan_input.strategy = strategy.into();
    }

    let result = repayment::plan_repayment(&plan_input)?;
    Ok(serde_json::to_value(result)?)
}

/// Parse `NAME:BALANCE:ANNUAL_RATE_PCT[:MINIMUM_PAYMENT]`.
pub fn parse_loan_arg(arg: &str) -> Result<LoanInput, Box<dyn std::error::Error>> {
    let parts: Vec<&str> = arg.split(':').map(str::trim).collect();
    if parts.len() != 3 && parts.len() != 4 {
        return Err(format!(
            "Loan must be NAME:BALANCE:ANNUAL_RATE_PCT[:MINIMUM_PAYMENT], got '{}'",
            arg
        )
        .into());
    }

    let number = |label: &str, raw: &str| -> Result<Decimal, String> {
        raw.parse::<Decimal>()
            .map_err(|e| format!("Invalid {} '{}' in loan '{}': {}", label, raw, arg, e))
    };

    let mut loan = LoanInput::new(parts[0], number("balance", parts[1])?, number("rate", parts[2])?);
    if let Some(raw) = parts.get(3).copied().filter(|raw| !raw.is_empty()) {
        loan = loan.with_minimum_payment(number("minimum payment", raw)?);
    }
    Ok(loan)
}

use napi::Result as NapiResult;
use napi_derive::napi;
use rust_decimal::Decimal;

use debt_plan_core::budget::{self, BudgetInput};
use debt_plan_core::comparison::{self, StrategyComparisonInput};
use debt_plan_core::repayment::{self, RepaymentPlanInput};

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

// ---------------------------------------------------------------------------
// Repayment
// ---------------------------------------------------------------------------

/// Full month-by-month plan for one strategy. Input and output are JSON.
#[napi]
pub fn plan_repayment(input_json: String) -> NapiResult<String> {
    let input: RepaymentPlanInput = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = repayment::plan_repayment(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

/// Minimum payment applied to a loan that has none, as a decimal string.
#[napi]
pub fn default_minimum_payment(balance: String) -> NapiResult<String> {
    let balance: Decimal = balance.trim().parse().map_err(to_napi_error)?;
    Ok(repayment::default_minimum_payment(balance).to_string())
}

// ---------------------------------------------------------------------------
// Comparison
// ---------------------------------------------------------------------------

#[napi]
pub fn compare_strategies(input_json: String) -> NapiResult<String> {
    let input: StrategyComparisonInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = comparison::compare_strategies(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Budget
// ---------------------------------------------------------------------------

#[napi]
pub fn summarize_budget(input_json: String) -> NapiResult<String> {
    let input: BudgetInput = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = budget::summarize_budget(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

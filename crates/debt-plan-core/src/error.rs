use rust_decimal::Decimal;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DebtPlanError {
    #[error("Invalid input: {field}: {reason}")]
    InvalidInput { field: String, reason: String },

    #[error(
        "Insufficient income: minimum payments of {required} exceed the available budget of {available}"
    )]
    InsufficientIncomeUpfront { required: Decimal, available: Decimal },

    #[error(
        "Insufficient income in month {month}: minimum payments of {required} exceed the available budget of {available}"
    )]
    InsufficientIncomeAtMonth {
        month: u32,
        required: Decimal,
        available: Decimal,
    },

    #[error("Repayment did not converge within {months} months (outstanding balance: {remaining_balance})")]
    DidNotConverge {
        months: u32,
        remaining_balance: Decimal,
    },

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl DebtPlanError {
    /// True for the errors that mean the budget cannot carry the debt,
    /// as opposed to malformed input.
    pub fn is_infeasible(&self) -> bool {
        matches!(
            self,
            DebtPlanError::InsufficientIncomeUpfront { .. }
                | DebtPlanError::InsufficientIncomeAtMonth { .. }
                | DebtPlanError::DidNotConverge { .. }
        )
    }
}

impl From<serde_json::Error> for DebtPlanError {
    fn from(e: serde_json::Error) -> Self {
        DebtPlanError::SerializationError(e.to_string())
    }
}

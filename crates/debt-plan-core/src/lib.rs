pub mod error;
pub mod types;

#[cfg(feature = "repayment")]
pub mod repayment;

#[cfg(feature = "budget")]
pub mod budget;

#[cfg(feature = "comparison")]
pub mod comparison;

pub use error::DebtPlanError;
pub use types::*;

/// Standard result type for all debt-plan operations
pub type DebtPlanResult<T> = Result<T, DebtPlanError>;

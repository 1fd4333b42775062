pub mod loan;
pub mod simulator;
pub mod strategy;

pub use loan::{default_minimum_payment, LoanInput};
pub use simulator::{
    plan_repayment, simulate, LoanPayment, MonthlySnapshot, RepaymentPlanInput,
    RepaymentPlanOutput, RepaymentSummary,
};
pub use strategy::RepaymentStrategy;

//! Loan records and the per-run working copy the simulator mutates.
//!
//! Callers hand in [`LoanInput`] values; [`normalize_loans`] validates them and
//! produces [`Loan`] working copies with the minimum payment resolved and the
//! monthly rate derived. The caller's records are never touched.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::DebtPlanError;
use crate::types::{Money, Percent, Rate};
use crate::DebtPlanResult;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Share of the balance used when no minimum payment is given.
pub const DEFAULT_MIN_PAYMENT_RATE: Rate = dec!(0.05);
/// Floor for a defaulted minimum payment, in currency units.
pub const DEFAULT_MIN_PAYMENT_FLOOR: Money = dec!(1000);

const MONTHS_PER_YEAR: Decimal = dec!(12);
const PERCENT_DIVISOR: Decimal = dec!(100);

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// A loan as supplied by the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanInput {
    pub name: String,
    /// Principal currently owed.
    pub balance: Money,
    /// Contractual monthly payment. Unset or non-positive means "use the
    /// default rule" (see [`default_minimum_payment`]).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minimum_payment: Option<Money>,
    /// Nominal annual rate in percent (12 = 12% p.a.).
    pub annual_interest_rate: Percent,
}

impl LoanInput {
    pub fn new(name: impl Into<String>, balance: Money, annual_interest_rate: Percent) -> Self {
        Self {
            name: name.into(),
            balance,
            minimum_payment: None,
            annual_interest_rate,
        }
    }

    pub fn with_minimum_payment(mut self, minimum_payment: Money) -> Self {
        self.minimum_payment = Some(minimum_payment);
        self
    }
}

/// Working copy of a loan for the duration of one simulation run.
#[derive(Debug, Clone, PartialEq)]
pub struct Loan {
    /// Position in the caller's list; used for stable tie-breaking.
    pub index: usize,
    pub name: String,
    pub balance: Money,
    pub minimum_payment: Money,
    pub annual_interest_rate: Percent,
    pub monthly_rate: Rate,
    /// Whether `minimum_payment` came from the default rule.
    pub minimum_defaulted: bool,
}

impl Loan {
    pub fn is_active(&self) -> bool {
        self.balance > Decimal::ZERO
    }

    /// Interest for one month on the current balance.
    pub fn monthly_interest(&self) -> Money {
        self.balance.saturating_mul(self.monthly_rate)
    }

    /// Charge one month of interest. Returns the interest charged, or `None`
    /// if the grown balance no longer fits in a `Decimal`.
    pub fn accrue_interest(&mut self) -> Option<Money> {
        let interest = self.balance.checked_mul(self.monthly_rate)?;
        self.balance = self.balance.checked_add(interest)?;
        Some(interest)
    }
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// `max(balance * 5%, 1000)`.
pub fn default_minimum_payment(balance: Money) -> Money {
    (balance * DEFAULT_MIN_PAYMENT_RATE).max(DEFAULT_MIN_PAYMENT_FLOOR)
}

/// Convert a nominal annual percentage into a monthly decimal rate.
pub fn monthly_rate(annual_interest_rate: Percent) -> Rate {
    annual_interest_rate / MONTHS_PER_YEAR / PERCENT_DIVISOR
}

/// Validate caller loans and build the per-run working copies.
pub fn normalize_loans(loans: &[LoanInput]) -> DebtPlanResult<Vec<Loan>> {
    loans
        .iter()
        .enumerate()
        .map(|(index, input)| normalize_loan(index, input))
        .collect()
}

fn normalize_loan(index: usize, input: &LoanInput) -> DebtPlanResult<Loan> {
    validate_loan_input(index, input)?;

    let (minimum_payment, minimum_defaulted) = match input.minimum_payment {
        Some(payment) if payment > Decimal::ZERO => (payment, false),
        _ => (default_minimum_payment(input.balance), true),
    };

    Ok(Loan {
        index,
        name: input.name.clone(),
        balance: input.balance,
        minimum_payment,
        annual_interest_rate: input.annual_interest_rate,
        monthly_rate: monthly_rate(input.annual_interest_rate),
        minimum_defaulted,
    })
}

fn validate_loan_input(index: usize, input: &LoanInput) -> DebtPlanResult<()> {
    if input.name.trim().is_empty() {
        return Err(DebtPlanError::InvalidInput {
            field: format!("loans[{index}].name"),
            reason: "Loan name must not be empty".into(),
        });
    }
    if input.balance < Decimal::ZERO {
        return Err(DebtPlanError::InvalidInput {
            field: format!("loans[{index}].balance"),
            reason: format!("Balance of '{}' cannot be negative", input.name),
        });
    }
    if input.annual_interest_rate < Decimal::ZERO {
        return Err(DebtPlanError::InvalidInput {
            field: format!("loans[{index}].annual_interest_rate"),
            reason: format!("Interest rate of '{}' cannot be negative", input.name),
        });
    }
    Ok(())
}

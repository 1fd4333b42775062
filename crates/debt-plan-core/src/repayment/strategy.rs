use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use crate::error::DebtPlanError;
use crate::repayment::loan::Loan;

/// Order in which surplus cash is pointed at outstanding loans.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum RepaymentStrategy {
    /// Smallest current balance first.
    #[default]
    Snowball,
    /// Highest annual interest rate first.
    Avalanche,
}

impl RepaymentStrategy {
    pub const ALL: [RepaymentStrategy; 2] = [RepaymentStrategy::Snowball, RepaymentStrategy::Avalanche];

    pub fn as_str(&self) -> &'static str {
        match self {
            RepaymentStrategy::Snowball => "snowball",
            RepaymentStrategy::Avalanche => "avalanche",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            RepaymentStrategy::Snowball => "Debt snowball: smallest balance first",
            RepaymentStrategy::Avalanche => "Debt avalanche: highest interest rate first",
        }
    }

    /// Priority comparison between two loans. `Less` means `a` receives
    /// surplus before `b`.
    pub fn compare(&self, a: &Loan, b: &Loan) -> Ordering {
        match self {
            RepaymentStrategy::Snowball => a.balance.cmp(&b.balance),
            RepaymentStrategy::Avalanche => b.annual_interest_rate.cmp(&a.annual_interest_rate),
        }
    }

    /// Sort loan indices into priority order. Stable: equal keys keep their
    /// relative order from `indices`.
    pub fn prioritize(&self, indices: &mut [usize], loans: &[Loan]) {
        indices.sort_by(|&a, &b| self.compare(&loans[a], &loans[b]));
    }
}

impl fmt::Display for RepaymentStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RepaymentStrategy {
    type Err = DebtPlanError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "snowball" => Ok(RepaymentStrategy::Snowball),
            "avalanche" => Ok(RepaymentStrategy::Avalanche),
            other => Err(DebtPlanError::InvalidInput {
                field: "strategy".into(),
                reason: format!("Unknown strategy '{other}', expected 'snowball' or 'avalanche'"),
            }),
        }
    }
}

impl TryFrom<String> for RepaymentStrategy {
    type Error = DebtPlanError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<RepaymentStrategy> for String {
    fn from(value: RepaymentStrategy) -> Self {
        value.as_str().to_string()
    }
}

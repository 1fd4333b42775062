//! Snowball vs avalanche on the same debts and budget.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::repayment::loan::LoanInput;
use crate::repayment::simulator::{plan_repayment, LoanPayoff, RepaymentPlanInput, RepaymentSummary};
use crate::repayment::strategy::RepaymentStrategy;
use crate::types::{with_metadata, ComputationOutput, Money};
use crate::DebtPlanResult;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StrategyComparisonInput {
    pub income: Money,
    pub fixed_expenses: Money,
    pub loans: Vec<LoanInput>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_months: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
}

impl StrategyComparisonInput {
    fn plan_input(&self, strategy: RepaymentStrategy) -> RepaymentPlanInput {
        RepaymentPlanInput {
            income: self.income,
            fixed_expenses: self.fixed_expenses,
            loans: self.loans.clone(),
            strategy,
            max_months: self.max_months,
            start_date: self.start_date,
        }
    }
}

/// Headline figures for one strategy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrategyOutcome {
    pub strategy: RepaymentStrategy,
    pub months_to_debt_free: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub debt_free_date: Option<NaiveDate>,
    pub total_paid: Money,
    pub total_interest: Money,
    pub payoff_order: Vec<LoanPayoff>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StrategyComparison {
    pub snowball: StrategyOutcome,
    pub avalanche: StrategyOutcome,
    /// Snowball interest minus avalanche interest.
    pub interest_saved: Money,
    /// Snowball months minus avalanche months; negative when snowball is faster.
    pub months_saved: i64,
    pub recommended: RepaymentStrategy,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Run both strategies and recommend one: lowest total interest, then fewest
/// months, then avalanche.
pub fn compare_strategies(
    input: &StrategyComparisonInput,
) -> DebtPlanResult<ComputationOutput<StrategyComparison>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    let snowball_plan = plan_repayment(&input.plan_input(RepaymentStrategy::Snowball))?;
    let avalanche_plan = plan_repayment(&input.plan_input(RepaymentStrategy::Avalanche))?;

    // Both runs see the same loans, so their input warnings are identical
    warnings.extend(snowball_plan.warnings);

    let outcome = |strategy, summary: RepaymentSummary| StrategyOutcome {
        strategy,
        months_to_debt_free: summary.months_to_debt_free,
        debt_free_date: summary.debt_free_date,
        total_paid: summary.total_paid,
        total_interest: summary.total_interest,
        payoff_order: summary.payoff_order,
    };
    let snowball = outcome(RepaymentStrategy::Snowball, snowball_plan.result.summary);
    let avalanche = outcome(RepaymentStrategy::Avalanche, avalanche_plan.result.summary);

    let interest_saved = snowball.total_interest - avalanche.total_interest;
    let months_saved =
        i64::from(snowball.months_to_debt_free) - i64::from(avalanche.months_to_debt_free);

    let recommended = if snowball.total_interest < avalanche.total_interest
        || (snowball.total_interest == avalanche.total_interest && months_saved < 0)
    {
        RepaymentStrategy::Snowball
    } else {
        RepaymentStrategy::Avalanche
    };

    if snowball.payoff_order.iter().map(|p| &p.loan_name).eq(avalanche
        .payoff_order
        .iter()
        .map(|p| &p.loan_name))
        && interest_saved.is_zero()
    {
        warnings.push("Both strategies retire the loans identically".into());
    }

    log::debug!(
        "compared strategies: interest saved by avalanche {interest_saved}, months saved {months_saved}"
    );

    let output = StrategyComparison {
        snowball,
        avalanche,
        interest_saved,
        months_saved,
        recommended,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Debt snowball vs debt avalanche under the same monthly budget",
        input,
        warnings,
        elapsed,
        output,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DebtPlanError;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn two_loans() -> StrategyComparisonInput {
        StrategyComparisonInput {
            income: dec!(20000),
            fixed_expenses: Decimal::ZERO,
            loans: vec![
                LoanInput::new("L1", dec!(10000), dec!(10)).with_minimum_payment(dec!(5000)),
                LoanInput::new("L2", dec!(50000), dec!(20)).with_minimum_payment(dec!(5000)),
            ],
            max_months: None,
            start_date: None,
        }
    }

    #[test]
    fn test_avalanche_saves_interest_on_high_rate_balance() {
        let input = StrategyComparisonInput {
            income: dec!(3000),
            fixed_expenses: Decimal::ZERO,
            loans: vec![
                LoanInput::new("Car", dec!(10000), dec!(5)).with_minimum_payment(dec!(500)),
                LoanInput::new("Card", dec!(12000), dec!(24)).with_minimum_payment(dec!(500)),
            ],
            max_months: None,
            start_date: None,
        };
        let result = compare_strategies(&input).unwrap();
        let out = &result.result;

        assert!(out.interest_saved > Decimal::ZERO);
        assert_eq!(out.recommended, RepaymentStrategy::Avalanche);
        assert_eq!(out.snowball.payoff_order[0].loan_name, "Car");
        assert_eq!(out.avalanche.payoff_order[0].loan_name, "Card");
    }

    #[test]
    fn test_snowball_wins_when_small_loan_strands_its_minimum() {
        // Under avalanche L1's 5000 minimum keeps being due after L1 is
        // nearly gone, and the unused part of it is not redirected to L2
        let result = compare_strategies(&two_loans()).unwrap();
        let out = &result.result;

        assert!(out.interest_saved < Decimal::ZERO);
        assert_eq!(out.recommended, RepaymentStrategy::Snowball);
        assert_eq!(out.snowball.payoff_order[0].loan_name, "L1");
        assert_eq!(out.snowball.payoff_order[0].payoff_month, 1);
    }

    #[test]
    fn test_single_loan_strategies_tie() {
        let mut input = two_loans();
        input.loans.truncate(1);
        let result = compare_strategies(&input).unwrap();
        let out = &result.result;

        assert_eq!(out.interest_saved, Decimal::ZERO);
        assert_eq!(out.months_saved, 0);
        // Ties go to avalanche
        assert_eq!(out.recommended, RepaymentStrategy::Avalanche);
        assert!(result
            .warnings
            .iter()
            .any(|w| w.contains("identically")));
    }

    #[test]
    fn test_infeasible_budget_propagates() {
        let mut input = two_loans();
        input.income = dec!(9000);
        let err = compare_strategies(&input).unwrap_err();
        assert!(matches!(err, DebtPlanError::InsufficientIncomeUpfront { .. }));
    }
}

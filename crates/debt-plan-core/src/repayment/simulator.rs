//! Month-by-month repayment simulation under a fixed monthly budget.
//!
//! Each month: interest accrues on every outstanding balance, outstanding
//! loans are ranked by the chosen strategy, every loan receives its minimum
//! payment, and whatever budget is left over cascades down the ranking
//! ("waterfall") until it runs out or every loan is covered.
//!
//! The caller's loans are copied into per-run working records, so repeated
//! calls with the same input always produce the same schedule.

use chrono::{Months, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::DebtPlanError;
use crate::repayment::loan::{normalize_loans, Loan, LoanInput};
use crate::repayment::strategy::RepaymentStrategy;
use crate::types::{checked_total, saturating_total, with_metadata, ComputationOutput, Money, Percent};
use crate::DebtPlanResult;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Simulation horizon guard: 100 years of monthly payments.
pub const DEFAULT_MAX_MONTHS: u32 = 1200;

// ---------------------------------------------------------------------------
// Input / Output Types
// ---------------------------------------------------------------------------

/// One loan's line in a monthly snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanPayment {
    pub loan_name: String,
    /// Contractual minimum for the loan.
    pub mandatory_payment: Money,
    /// Surplus directed at this loan on top of the minimum.
    pub extra_payment: Money,
    /// Cash actually applied; never more than the balance owed.
    pub total_payment: Money,
    /// Interest the remaining balance would attract next month. Informational.
    pub interest_accrued: Money,
    pub remaining_balance: Money,
    pub interest_rate: Percent,
}

/// All payments made in one simulated month, in priority order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlySnapshot {
    /// 1-based month index.
    pub month: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
    pub payments: Vec<LoanPayment>,
}

impl MonthlySnapshot {
    pub fn total_payment(&self) -> Money {
        saturating_total(self.payments.iter().map(|p| p.total_payment))
    }

    pub fn total_extra_payment(&self) -> Money {
        saturating_total(self.payments.iter().map(|p| p.extra_payment))
    }

    pub fn remaining_balance(&self) -> Money {
        saturating_total(self.payments.iter().map(|p| p.remaining_balance))
    }
}

/// Input for a full repayment plan.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepaymentPlanInput {
    /// Monthly income.
    pub income: Money,
    /// Monthly living costs that come before any debt payment.
    pub fixed_expenses: Money,
    pub loans: Vec<LoanInput>,
    /// Defaults to snowball when omitted.
    #[serde(default)]
    pub strategy: RepaymentStrategy,
    /// Upper bound on simulated months (defaults to 1200).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_months: Option<u32>,
    /// Calendar date of the first payment; enables dated snapshots.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
}

/// Output of `plan_repayment`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepaymentPlanOutput {
    pub strategy: RepaymentStrategy,
    /// income - fixed_expenses.
    pub available_budget: Money,
    /// Sum of every loan's (possibly defaulted) minimum payment.
    pub total_minimum_payments: Money,
    pub schedule: Vec<MonthlySnapshot>,
    pub summary: RepaymentSummary,
}

/// Whole-plan totals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RepaymentSummary {
    pub months_to_debt_free: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub debt_free_date: Option<NaiveDate>,
    pub total_paid: Money,
    /// Interest actually charged over the life of the plan.
    pub total_interest: Money,
    pub total_extra_paid: Money,
    /// Loans in the order they reach zero.
    pub payoff_order: Vec<LoanPayoff>,
}

/// When and at what cost a single loan was retired.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanPayoff {
    pub loan_name: String,
    /// 0 when the loan had nothing owing at the start.
    pub payoff_month: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payoff_date: Option<NaiveDate>,
    pub total_paid: Money,
    pub total_interest: Money,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Simulate repayment of `loans` from `income - fixed_expenses` each month.
///
/// Returns the monthly snapshots up to and including the month the last
/// balance reaches zero. Fails with `InsufficientIncomeUpfront` or
/// `InsufficientIncomeAtMonth` when minimum payments cannot be met, and with
/// `DidNotConverge` after `DEFAULT_MAX_MONTHS` months.
pub fn simulate(
    income: Money,
    fixed_expenses: Money,
    loans: &[LoanInput],
    strategy: RepaymentStrategy,
) -> DebtPlanResult<Vec<MonthlySnapshot>> {
    validate_budget(income, fixed_expenses)?;
    let loans = normalize_loans(loans)?;
    let trace = run_schedule(income - fixed_expenses, loans, strategy, DEFAULT_MAX_MONTHS)?;
    Ok(trace.schedule)
}

/// Build a full repayment plan: schedule, summary and advisory warnings.
pub fn plan_repayment(
    input: &RepaymentPlanInput,
) -> DebtPlanResult<ComputationOutput<RepaymentPlanOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    validate_budget(input.income, input.fixed_expenses)?;
    let max_months = input.max_months.unwrap_or(DEFAULT_MAX_MONTHS);
    if max_months == 0 {
        return Err(DebtPlanError::InvalidInput {
            field: "max_months".into(),
            reason: "Simulation horizon must be at least 1 month".into(),
        });
    }

    let loans = normalize_loans(&input.loans)?;
    for loan in &loans {
        if loan.minimum_defaulted {
            warnings.push(format!(
                "No minimum payment given for '{}'; using {}",
                loan.name, loan.minimum_payment
            ));
        }
        if loan.balance.is_zero() {
            warnings.push(format!("'{}' has no outstanding balance", loan.name));
        }
    }

    let available_budget = input.income - input.fixed_expenses;
    let total_minimum_payments = saturating_total(loans.iter().map(|l| l.minimum_payment));
    if total_minimum_payments == available_budget && loans.iter().any(Loan::is_active) {
        warnings.push(
            "Budget exactly covers minimum payments; no surplus is available for extra payments"
                .into(),
        );
    }

    log::debug!(
        "planning {} loans with {} strategy, budget {}, horizon {} months",
        loans.len(),
        input.strategy,
        available_budget,
        max_months
    );

    let trace = run_schedule(available_budget, loans.clone(), input.strategy, max_months)?;

    let mut schedule = trace.schedule;
    if let Some(start_date) = input.start_date {
        for snapshot in schedule.iter_mut() {
            snapshot.date = month_date(start_date, snapshot.month);
        }
    }

    let months_to_debt_free = schedule.len() as u32;
    let mut payoff_order: Vec<LoanPayoff> = loans
        .iter()
        .map(|loan| LoanPayoff {
            loan_name: loan.name.clone(),
            payoff_month: trace.payoff_month[loan.index],
            payoff_date: input
                .start_date
                .and_then(|d| month_date(d, trace.payoff_month[loan.index])),
            total_paid: trace.total_paid[loan.index],
            total_interest: trace.interest_charged[loan.index],
        })
        .collect();
    // Stable: loans retired in the same month keep input order
    payoff_order.sort_by_key(|p| p.payoff_month);

    let summary = RepaymentSummary {
        months_to_debt_free,
        debt_free_date: input
            .start_date
            .and_then(|d| month_date(d, months_to_debt_free)),
        total_paid: saturating_total(trace.total_paid.iter().copied()),
        total_interest: saturating_total(trace.interest_charged.iter().copied()),
        total_extra_paid: saturating_total(trace.extra_paid.iter().copied()),
        payoff_order,
    };

    log::debug!(
        "{} plan clears all debt in {} months, total interest {}",
        input.strategy,
        summary.months_to_debt_free,
        summary.total_interest
    );

    let output = RepaymentPlanOutput {
        strategy: input.strategy,
        available_budget,
        total_minimum_payments,
        schedule,
        summary,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        &format!(
            "{}; interest accrues monthly before payment, surplus applied as a waterfall",
            input.strategy.description()
        ),
        input,
        warnings,
        elapsed,
        output,
    ))
}

// ---------------------------------------------------------------------------
// Engine
// ---------------------------------------------------------------------------

/// Everything the engine records while running, indexed by loan position.
struct ScheduleTrace {
    schedule: Vec<MonthlySnapshot>,
    interest_charged: Vec<Money>,
    total_paid: Vec<Money>,
    extra_paid: Vec<Money>,
    payoff_month: Vec<u32>,
}

/// This month's payment for one loan before it is applied.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Allocation {
    index: usize,
    minimum: Money,
    extra: Money,
}

impl Allocation {
    fn actual_payment(&self) -> Money {
        self.minimum + self.extra
    }
}

fn run_schedule(
    available_budget: Money,
    mut loans: Vec<Loan>,
    strategy: RepaymentStrategy,
    max_months: u32,
) -> DebtPlanResult<ScheduleTrace> {
    minimums_due(None, loans.iter().map(|l| l.minimum_payment), available_budget)?;

    let count = loans.len();
    let mut trace = ScheduleTrace {
        schedule: Vec::new(),
        interest_charged: vec![Decimal::ZERO; count],
        total_paid: vec![Decimal::ZERO; count],
        extra_paid: vec![Decimal::ZERO; count],
        payoff_month: vec![0; count],
    };

    let mut month: u32 = 1;
    while loans.iter().any(Loan::is_active) {
        if month > max_months {
            return Err(did_not_converge(max_months, &loans));
        }

        // Interest is charged on the pre-payment balance
        let mut overflowed = false;
        for loan in loans.iter_mut().filter(|l| l.is_active()) {
            match loan.accrue_interest() {
                Some(interest) => {
                    trace.interest_charged[loan.index] =
                        trace.interest_charged[loan.index].saturating_add(interest);
                }
                None => {
                    overflowed = true;
                    break;
                }
            }
        }
        if overflowed {
            return Err(did_not_converge(month, &loans));
        }

        let mut priority: Vec<usize> = loans
            .iter()
            .filter(|l| l.is_active())
            .map(|l| l.index)
            .collect();
        strategy.prioritize(&mut priority, &loans);

        // Only active loans count here. Minimums are fixed per loan, so this
        // never exceeds the upfront total and the month-level error is not
        // reachable through `simulate`.
        let minimums = minimums_due(
            Some(month),
            priority.iter().map(|&i| loans[i].minimum_payment),
            available_budget,
        )?;

        let free_cash = available_budget - minimums;
        log::trace!(
            "month {month}: {} active loans, free cash {free_cash}",
            priority.len()
        );

        let mut payments = Vec::with_capacity(priority.len());
        for allocation in allocate_surplus(&priority, &loans, free_cash) {
            let loan = &mut loans[allocation.index];
            let applied = allocation.actual_payment().min(loan.balance);
            loan.balance -= applied;

            trace.total_paid[loan.index] = trace.total_paid[loan.index].saturating_add(applied);
            trace.extra_paid[loan.index] =
                trace.extra_paid[loan.index].saturating_add(allocation.extra);
            if !loan.is_active() {
                trace.payoff_month[loan.index] = month;
            }

            payments.push(LoanPayment {
                loan_name: loan.name.clone(),
                mandatory_payment: allocation.minimum,
                extra_payment: allocation.extra,
                total_payment: applied,
                interest_accrued: loan.monthly_interest(),
                remaining_balance: loan.balance,
                interest_rate: loan.annual_interest_rate,
            });
        }

        trace.schedule.push(MonthlySnapshot {
            month,
            date: None,
            payments,
        });
        month += 1;
    }

    Ok(trace)
}

/// Sum the minimums due and gate them against the budget. A sum past
/// `Decimal::MAX` is reported as `required = Decimal::MAX` and never fits.
fn minimums_due(
    month: Option<u32>,
    minimums: impl Iterator<Item = Money>,
    available: Money,
) -> DebtPlanResult<Money> {
    match checked_total(minimums) {
        Some(required) => {
            ensure_minimums_covered(month, required, available)?;
            Ok(required)
        }
        None => Err(insufficient_income(month, Decimal::MAX, available)),
    }
}

/// Budget feasibility gate. `month` is `None` for the check made before the
/// first month is simulated.
fn ensure_minimums_covered(
    month: Option<u32>,
    required: Money,
    available: Money,
) -> DebtPlanResult<()> {
    if required <= available {
        return Ok(());
    }
    Err(insufficient_income(month, required, available))
}

fn insufficient_income(month: Option<u32>, required: Money, available: Money) -> DebtPlanError {
    log::debug!("minimum payments {required} exceed budget {available} (month {month:?})");
    match month {
        None => DebtPlanError::InsufficientIncomeUpfront {
            required,
            available,
        },
        Some(month) => DebtPlanError::InsufficientIncomeAtMonth {
            month,
            required,
            available,
        },
    }
}

fn did_not_converge(months: u32, loans: &[Loan]) -> DebtPlanError {
    let remaining_balance = saturating_total(loans.iter().map(|l| l.balance));
    log::debug!("no payoff after {months} months, {remaining_balance} still owed");
    DebtPlanError::DidNotConverge {
        months,
        remaining_balance,
    }
}

/// Walk the priority list handing out `free_cash`. Each loan takes at most
/// what it still owes after its minimum; leftovers move to the next loan.
fn allocate_surplus(priority: &[usize], loans: &[Loan], free_cash: Money) -> Vec<Allocation> {
    let (allocations, _unallocated) = priority.iter().fold(
        (Vec::with_capacity(priority.len()), free_cash),
        |(mut acc, cash), &index| {
            let loan = &loans[index];
            let headroom = loan.balance - loan.minimum_payment;
            let extra = if headroom > Decimal::ZERO && cash > Decimal::ZERO {
                cash.min(headroom)
            } else {
                Decimal::ZERO
            };
            acc.push(Allocation {
                index,
                minimum: loan.minimum_payment,
                extra,
            });
            (acc, cash - extra)
        },
    );
    allocations
}

fn validate_budget(income: Money, fixed_expenses: Money) -> DebtPlanResult<()> {
    if income < Decimal::ZERO {
        return Err(DebtPlanError::InvalidInput {
            field: "income".into(),
            reason: "Income cannot be negative".into(),
        });
    }
    if fixed_expenses < Decimal::ZERO {
        return Err(DebtPlanError::InvalidInput {
            field: "fixed_expenses".into(),
            reason: "Fixed expenses cannot be negative".into(),
        });
    }
    Ok(())
}

/// Calendar date of a 1-based plan month; month 0 maps to the start date.
fn month_date(start: NaiveDate, month: u32) -> Option<NaiveDate> {
    start.checked_add_months(Months::new(month.saturating_sub(1)))
}

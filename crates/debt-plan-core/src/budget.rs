use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Instant;

use crate::error::DebtPlanError;
use crate::types::{checked_total, with_metadata, ComputationOutput, Money, Rate};
use crate::DebtPlanResult;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Whether an entry brings money in or takes it out.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    Income,
    Expense,
}

/// A single recorded income or expense.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BudgetEntry {
    /// Category name, e.g. "Salary", "Rent", "Groceries"
    pub category: String,
    pub kind: EntryKind,
    pub amount: Money,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
}

/// Inclusive date window.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BudgetPeriod {
    pub from: NaiveDate,
    pub to: NaiveDate,
}

impl BudgetPeriod {
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.from <= date && date <= self.to
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BudgetInput {
    pub entries: Vec<BudgetEntry>,
    /// Only dated entries inside this window are counted. Undated entries
    /// are always counted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub period: Option<BudgetPeriod>,
}

/// Total for one category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryTotal {
    pub category: String,
    pub kind: EntryKind,
    pub total: Money,
    pub entry_count: u32,
    /// Share of all income (or all expenses), 0..1.
    pub share: Rate,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BudgetSummary {
    pub total_income: Money,
    pub total_expenses: Money,
    /// total_income - total_expenses; negative when overspent.
    pub available_budget: Money,
    pub income_categories: Vec<CategoryTotal>,
    pub expense_categories: Vec<CategoryTotal>,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Aggregate income and expense entries by category.
///
/// The resulting `total_income` and `total_expenses` are what a repayment
/// plan takes as `income` and `fixed_expenses`.
pub fn summarize_budget(input: &BudgetInput) -> DebtPlanResult<ComputationOutput<BudgetSummary>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    validate_budget_input(input)?;

    let mut totals: BTreeMap<(EntryKind, &str), (Money, u32)> = BTreeMap::new();
    let mut excluded = 0usize;
    for (i, entry) in input.entries.iter().enumerate() {
        let in_period = match (&input.period, entry.date) {
            (Some(period), Some(date)) => period.contains(date),
            _ => true,
        };
        if !in_period {
            excluded += 1;
            continue;
        }
        let slot = totals
            .entry((entry.kind, entry.category.trim()))
            .or_insert((Decimal::ZERO, 0));
        slot.0 = slot
            .0
            .checked_add(entry.amount)
            .ok_or_else(|| DebtPlanError::InvalidInput {
                field: format!("entries[{i}].amount"),
                reason: format!(
                    "Total for category '{}' exceeds the representable range",
                    entry.category.trim()
                ),
            })?;
        slot.1 += 1;
    }

    if excluded > 0 {
        warnings.push(format!("Ignored {excluded} dated entries outside the period"));
    }

    let total_for = |kind: EntryKind| -> DebtPlanResult<Money> {
        checked_total(
            totals
                .iter()
                .filter(|((k, _), _)| *k == kind)
                .map(|(_, (total, _))| *total),
        )
        .ok_or_else(|| DebtPlanError::InvalidInput {
            field: "entries".into(),
            reason: format!("Total {kind:?} exceeds the representable range"),
        })
    };
    let total_income = total_for(EntryKind::Income)?;
    let total_expenses = total_for(EntryKind::Expense)?;

    let categories_for = |kind: EntryKind, kind_total: Money| -> Vec<CategoryTotal> {
        totals
            .iter()
            .filter(|((k, _), _)| *k == kind)
            .map(|((_, name), (total, count))| CategoryTotal {
                category: name.to_string(),
                kind,
                total: *total,
                entry_count: *count,
                share: if kind_total.is_zero() {
                    Decimal::ZERO
                } else {
                    *total / kind_total
                },
            })
            .collect()
    };
    let income_categories = categories_for(EntryKind::Income, total_income);
    let expense_categories = categories_for(EntryKind::Expense, total_expenses);

    let available_budget = total_income - total_expenses;
    if total_income.is_zero() {
        warnings.push("No income recorded".into());
    }
    if available_budget < Decimal::ZERO {
        warnings.push(format!(
            "Expenses exceed income by {}",
            available_budget.abs()
        ));
    }

    let output = BudgetSummary {
        total_income,
        total_expenses,
        available_budget,
        income_categories,
        expense_categories,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Category totals of recorded income and expenses",
        input,
        warnings,
        elapsed,
        output,
    ))
}

fn validate_budget_input(input: &BudgetInput) -> DebtPlanResult<()> {
    for (i, entry) in input.entries.iter().enumerate() {
        if entry.category.trim().is_empty() {
            return Err(DebtPlanError::InvalidInput {
                field: format!("entries[{i}].category"),
                reason: "Category must not be empty".into(),
            });
        }
        if entry.amount < Decimal::ZERO {
            return Err(DebtPlanError::InvalidInput {
                field: format!("entries[{i}].amount"),
                reason: "Amount cannot be negative; use the entry kind for direction".into(),
            });
        }
    }
    if let Some(period) = &input.period {
        if period.from > period.to {
            return Err(DebtPlanError::InvalidInput {
                field: "period".into(),
                reason: "Period start must not be after its end".into(),
            });
        }
    }
    Ok(())
}

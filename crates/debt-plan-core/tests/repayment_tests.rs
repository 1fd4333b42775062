use debt_plan_core::repayment::{
    plan_repayment, simulate, LoanInput, MonthlySnapshot, RepaymentPlanInput, RepaymentStrategy,
};
use debt_plan_core::DebtPlanError;
use pretty_assertions::assert_eq;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

// ===========================================================================
// Fixtures
// ===========================================================================

fn household_loans() -> Vec<LoanInput> {
    vec![
        LoanInput::new("Credit card", dec!(6500), dec!(21.9)).with_minimum_payment(dec!(200)),
        LoanInput::new("Car loan", dec!(14000), dec!(6.5)).with_minimum_payment(dec!(350)),
        LoanInput::new("Store card", dec!(1200), dec!(27)).with_minimum_payment(dec!(60)),
        LoanInput::new("Student loan", dec!(22000), dec!(4.2)).with_minimum_payment(dec!(250)),
    ]
}

const HOUSEHOLD_INCOME: Decimal = dec!(5200);
const HOUSEHOLD_EXPENSES: Decimal = dec!(3700);

fn household_schedule(strategy: RepaymentStrategy) -> Vec<MonthlySnapshot> {
    simulate(HOUSEHOLD_INCOME, HOUSEHOLD_EXPENSES, &household_loans(), strategy).unwrap()
}

fn scenario_b_loans() -> Vec<LoanInput> {
    vec![
        LoanInput::new("L1", dec!(10000), dec!(10)).with_minimum_payment(dec!(5000)),
        LoanInput::new("L2", dec!(50000), dec!(20)).with_minimum_payment(dec!(5000)),
    ]
}

fn names(snapshot: &MonthlySnapshot) -> Vec<&str> {
    snapshot.payments.iter().map(|p| p.loan_name.as_str()).collect()
}

// ===========================================================================
// Worked scenarios
// ===========================================================================

#[test]
fn test_single_loan_receives_whole_surplus() {
    let loans = vec![
        LoanInput::new("Mortgage", dec!(250000), dec!(12)).with_minimum_payment(dec!(15000)),
    ];
    let schedule = simulate(dec!(100000), dec!(50000), &loans, RepaymentStrategy::Snowball).unwrap();

    let first = &schedule[0].payments[0];
    // 250000 * 1% = 2500 interest, then 15000 + 35000 surplus
    assert_eq!(first.mandatory_payment, dec!(15000));
    assert_eq!(first.extra_payment, dec!(35000));
    assert_eq!(first.total_payment, dec!(50000));
    assert_eq!(first.remaining_balance, dec!(202500));
    assert_eq!(first.interest_rate, dec!(12));

    // Every month but the last pays the full 50000 budget
    for snapshot in &schedule[..schedule.len() - 1] {
        assert_eq!(snapshot.total_payment(), dec!(50000));
    }
    assert_eq!(schedule.last().unwrap().remaining_balance(), Decimal::ZERO);
}

#[test]
fn test_strategies_point_surplus_at_different_loans() {
    let snowball = simulate(dec!(20000), Decimal::ZERO, &scenario_b_loans(), RepaymentStrategy::Snowball)
        .unwrap();
    let avalanche = simulate(dec!(20000), Decimal::ZERO, &scenario_b_loans(), RepaymentStrategy::Avalanche)
        .unwrap();

    assert_eq!(names(&snowball[0]), vec!["L1", "L2"]);
    assert_eq!(names(&avalanche[0]), vec!["L2", "L1"]);
    assert_ne!(snowball, avalanche);

    // Avalanche: the 20% loan absorbs all 10000 of surplus
    let l2 = &avalanche[0].payments[0];
    assert_eq!(l2.extra_payment, dec!(10000));
    assert_eq!(l2.total_payment, dec!(15000));
    let l1 = &avalanche[0].payments[1];
    assert_eq!(l1.extra_payment, Decimal::ZERO);
    assert_eq!(l1.total_payment, dec!(5000));

    // Snowball: L1 is cleared in month one, the rest spills to L2
    let l1 = &snowball[0].payments[0];
    assert_eq!(l1.remaining_balance, Decimal::ZERO);
    assert_eq!(l1.total_payment, l1.mandatory_payment + l1.extra_payment);
    let l2 = &snowball[0].payments[1];
    assert_eq!(l1.extra_payment + l2.extra_payment, dec!(10000));
    assert_eq!(names(&snowball[1]), vec!["L2"]);
}

#[test]
fn test_minimums_above_budget_fail_before_any_month() {
    let loans = vec![LoanInput::new("Loan", dec!(100000), dec!(10)).with_minimum_payment(dec!(5000))];
    let err = simulate(dec!(10000), dec!(9000), &loans, RepaymentStrategy::Snowball).unwrap_err();

    match err {
        DebtPlanError::InsufficientIncomeUpfront { required, available } => {
            assert_eq!(required, dec!(5000));
            assert_eq!(available, dec!(1000));
        }
        other => panic!("Expected InsufficientIncomeUpfront, got {other:?}"),
    }
}

#[test]
fn test_unset_minimum_defaults_to_floor() {
    let input = RepaymentPlanInput {
        income: dec!(3000),
        fixed_expenses: Decimal::ZERO,
        loans: vec![LoanInput::new("Consumer", dec!(20000), Decimal::ZERO)],
        strategy: RepaymentStrategy::Snowball,
        max_months: None,
        start_date: None,
    };
    let result = plan_repayment(&input).unwrap();

    assert_eq!(result.result.total_minimum_payments, dec!(1000));
    assert_eq!(result.result.schedule[0].payments[0].mandatory_payment, dec!(1000));
    assert_eq!(result.result.schedule[0].payments[0].extra_payment, dec!(2000));
    // 20000 at 0% paid 3000 a month
    assert_eq!(result.result.summary.months_to_debt_free, 7);
}

// ===========================================================================
// Properties
// ===========================================================================

#[test]
fn test_zero_balances_produce_no_months() {
    let loans = vec![
        LoanInput::new("Closed card", Decimal::ZERO, dec!(19)).with_minimum_payment(dec!(100)),
        LoanInput::new("Closed loan", Decimal::ZERO, dec!(7)).with_minimum_payment(dec!(100)),
    ];
    let schedule = simulate(dec!(1000), Decimal::ZERO, &loans, RepaymentStrategy::Avalanche).unwrap();
    assert!(schedule.is_empty());
}

#[test]
fn test_no_loans_produce_no_months() {
    let schedule = simulate(dec!(1000), dec!(200), &[], RepaymentStrategy::Snowball).unwrap();
    assert!(schedule.is_empty());
}

#[test]
fn test_schedule_ends_with_all_balances_cleared() {
    for strategy in RepaymentStrategy::ALL {
        let schedule = household_schedule(strategy);
        assert!(!schedule.is_empty());

        let last = schedule.last().unwrap();
        assert!(
            last.payments.iter().all(|p| p.remaining_balance.is_zero()),
            "{strategy}: last month still owes {}",
            last.remaining_balance()
        );
        // Months are numbered consecutively from 1
        for (i, snapshot) in schedule.iter().enumerate() {
            assert_eq!(snapshot.month as usize, i + 1);
        }
    }
}

#[test]
fn test_balances_never_negative() {
    for strategy in RepaymentStrategy::ALL {
        for snapshot in household_schedule(strategy) {
            for payment in &snapshot.payments {
                assert!(payment.remaining_balance >= Decimal::ZERO);
                assert!(payment.total_payment <= payment.mandatory_payment + payment.extra_payment);
            }
        }
    }
}

#[test]
fn test_monthly_payments_within_budget() {
    let budget = HOUSEHOLD_INCOME - HOUSEHOLD_EXPENSES;
    for strategy in RepaymentStrategy::ALL {
        for snapshot in household_schedule(strategy) {
            assert!(
                snapshot.total_payment() <= budget,
                "{strategy} month {} pays {} against a budget of {budget}",
                snapshot.month,
                snapshot.total_payment()
            );
        }
    }
}

#[test]
fn test_snowball_priority_is_non_decreasing_balance() {
    for snapshot in household_schedule(RepaymentStrategy::Snowball) {
        // Balance at allocation time = what was paid + what is left
        let balances: Vec<Decimal> = snapshot
            .payments
            .iter()
            .map(|p| p.total_payment + p.remaining_balance)
            .collect();
        assert!(
            balances.windows(2).all(|w| w[0] <= w[1]),
            "month {}: {:?}",
            snapshot.month,
            balances
        );
    }
}

#[test]
fn test_avalanche_priority_is_non_increasing_rate() {
    for snapshot in household_schedule(RepaymentStrategy::Avalanche) {
        let rates: Vec<Decimal> = snapshot.payments.iter().map(|p| p.interest_rate).collect();
        assert!(
            rates.windows(2).all(|w| w[0] >= w[1]),
            "month {}: {:?}",
            snapshot.month,
            rates
        );
    }
}

#[test]
fn test_avalanche_month_one_order() {
    let schedule = household_schedule(RepaymentStrategy::Avalanche);
    assert_eq!(
        names(&schedule[0]),
        vec!["Store card", "Credit card", "Car loan", "Student loan"]
    );
    // Only the top priority loan gets surplus in month one
    assert_eq!(schedule[0].payments[0].extra_payment, dec!(640));
    assert!(schedule[0].payments[1..].iter().all(|p| p.extra_payment.is_zero()));
}

#[test]
fn test_equal_keys_keep_input_order() {
    let loans = vec![
        LoanInput::new("First", dec!(5000), dec!(12)).with_minimum_payment(dec!(100)),
        LoanInput::new("Second", dec!(5000), dec!(12)).with_minimum_payment(dec!(100)),
        LoanInput::new("Third", dec!(5000), dec!(12)).with_minimum_payment(dec!(100)),
    ];
    for strategy in RepaymentStrategy::ALL {
        let schedule = simulate(dec!(1000), Decimal::ZERO, &loans, strategy).unwrap();
        assert_eq!(names(&schedule[0]), vec!["First", "Second", "Third"]);
        assert_eq!(schedule[0].payments[0].extra_payment, dec!(700));
        assert!(schedule[0].payments[1].extra_payment.is_zero());
    }
}

#[test]
fn test_repeated_runs_are_identical_and_leave_input_untouched() {
    let loans = household_loans();
    let before = loans.clone();

    let first = simulate(HOUSEHOLD_INCOME, HOUSEHOLD_EXPENSES, &loans, RepaymentStrategy::Snowball)
        .unwrap();
    let second = simulate(HOUSEHOLD_INCOME, HOUSEHOLD_EXPENSES, &loans, RepaymentStrategy::Snowball)
        .unwrap();

    assert_eq!(first, second);
    assert_eq!(loans, before);
}

#[test]
fn test_plan_schedule_matches_simulate() {
    let input = RepaymentPlanInput {
        income: HOUSEHOLD_INCOME,
        fixed_expenses: HOUSEHOLD_EXPENSES,
        loans: household_loans(),
        strategy: RepaymentStrategy::Avalanche,
        max_months: None,
        start_date: None,
    };
    let plan = plan_repayment(&input).unwrap();
    assert_eq!(plan.result.schedule, household_schedule(RepaymentStrategy::Avalanche));
    assert_eq!(plan.result.summary.payoff_order.len(), 4);
    assert_eq!(plan.result.summary.payoff_order[0].loan_name, "Store card");
}

// ===========================================================================
// Failures
// ===========================================================================

#[test]
fn test_interest_outpacing_payment_does_not_converge() {
    // 13% on 100000 is ~1083 a month, more than the 1000 payment
    let loans = vec![LoanInput::new("Underwater", dec!(100000), dec!(13)).with_minimum_payment(dec!(1000))];
    let err = simulate(dec!(1000), Decimal::ZERO, &loans, RepaymentStrategy::Snowball).unwrap_err();

    match err {
        DebtPlanError::DidNotConverge { months, remaining_balance } => {
            assert_eq!(months, 1200);
            assert!(remaining_balance > dec!(100000));
        }
        other => panic!("Expected DidNotConverge, got {other:?}"),
    }
}

#[test]
fn test_invalid_loans_rejected_before_simulation() {
    let empty_name = vec![LoanInput::new("", dec!(100), dec!(5))];
    assert!(matches!(
        simulate(dec!(5000), Decimal::ZERO, &empty_name, RepaymentStrategy::Snowball),
        Err(DebtPlanError::InvalidInput { .. })
    ));

    let negative_balance = vec![LoanInput::new("Card", dec!(-100), dec!(5))];
    assert!(matches!(
        simulate(dec!(5000), Decimal::ZERO, &negative_balance, RepaymentStrategy::Snowball),
        Err(DebtPlanError::InvalidInput { .. })
    ));
}

#[test]
fn test_unknown_strategy_in_json_rejected() {
    let json = r#"{
        "income": "5000",
        "fixed_expenses": "1000",
        "loans": [{"name": "Card", "balance": "1000", "annual_interest_rate": "19"}],
        "strategy": "highest-balance"
    }"#;
    let err = serde_json::from_str::<RepaymentPlanInput>(json).unwrap_err();
    assert!(err.to_string().contains("Unknown strategy"));
}

#[test]
fn test_plan_input_from_json() {
    let json = r#"{
        "income": "100000",
        "fixed_expenses": "50000",
        "loans": [
            {"name": "Mortgage", "balance": "250000", "minimum_payment": "15000", "annual_interest_rate": "12"}
        ],
        "strategy": "avalanche",
        "start_date": "2025-01-01"
    }"#;
    let input: RepaymentPlanInput = serde_json::from_str(json).unwrap();
    let plan = plan_repayment(&input).unwrap();

    assert_eq!(plan.result.schedule[0].payments[0].remaining_balance, dec!(202500));
    assert_eq!(
        plan.result.schedule[1].date,
        chrono::NaiveDate::from_ymd_opt(2025, 2, 1)
    );
}

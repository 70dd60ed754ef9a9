use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use vastgoed_core::snowball::{
    compare_candidate, simulate_snowball, SnowballInput, SnowballProperty, SnowballStrategy,
};

fn property(id: &str, debt: i64, payment: i64, cashflow: i64, rate_bp: i64) -> SnowballProperty {
    SnowballProperty {
        id: id.into(),
        name: format!("Property {id}"),
        debt: Decimal::from(debt),
        monthly_payment: Decimal::from(payment),
        net_cashflow: Decimal::from(cashflow),
        interest_rate_pct: Decimal::new(rate_bp, 2),
    }
}

fn months(result: &vastgoed_core::snowball::SnowballResult) -> Vec<u32> {
    result.payoffs.iter().map(|p| p.months_to_payoff).collect()
}

// ---------------------------------------------------------------------------
// Portfolio scenarios
// ---------------------------------------------------------------------------

#[test]
fn test_three_property_portfolio() {
    let props = vec![
        property("lisbon", 180_000, 850, 250, 350),
        property("porto", 60_000, 400, 150, 400),
        property("faro", 95_000, 520, -50, 375),
    ];
    let out = simulate_snowball(&props, dec!(300), SnowballStrategy::Smallest).result;

    assert!(out.all_paid_off);
    // porto is smallest and is targeted first
    assert_eq!(out.payoffs[1].priority, 1);
    assert!(out.payoffs[1].months_to_payoff < out.payoffs[0].months_to_payoff);
    assert_eq!(
        out.months_to_debt_free,
        months(&out).into_iter().max().unwrap()
    );
    // 300 extra + 250 + 150; faro has negative cashflow and adds nothing
    assert_eq!(out.initial_monthly_pool, dec!(700));
}

#[test]
fn test_input_from_json() {
    let json = r#"{
        "properties": [
            { "id": "a", "debt": "1200", "monthly_payment": "100", "net_cashflow": "0" }
        ],
        "extra_monthly_cash": "100",
        "strategy": "smallest"
    }"#;
    let input: SnowballInput = serde_json::from_str(json).unwrap();
    let out = simulate_snowball(&input.properties, input.extra_monthly_cash, input.strategy);
    assert_eq!(months(&out.result), vec![6]);
}

#[test]
fn test_payoffs_in_input_order() {
    let props = vec![
        property("big", 5_000, 100, 0, 0),
        property("small", 500, 100, 0, 0),
    ];
    let out = simulate_snowball(&props, Decimal::ZERO, SnowballStrategy::Smallest).result;
    assert_eq!(out.payoffs[0].id, "big");
    assert_eq!(out.payoffs[1].id, "small");
}

#[test]
fn test_candidate_comparison_reports_existing_only() {
    let existing = vec![property("a", 10_000, 200, 100, 300), property("b", 20_000, 300, 50, 300)];
    let candidate = property("new", 0, 0, 400, 0);
    let out = compare_candidate(&existing, &candidate, Decimal::ZERO, SnowballStrategy::Smallest).result;
    assert_eq!(out.deltas.len(), 2);
    assert_eq!(out.with_candidate.payoffs.len(), 3);
    assert!(out.deltas.iter().all(|d| d.delta_months <= 0));
    assert!(out.debt_free_delta_months < 0);
}

#[test]
fn test_unpaid_interest_saturates_instead_of_overflowing() {
    // 1M at 60% with no payment and no pool: interest compounds for 1200 months
    let props = vec![property("runaway", 1_000_000, 0, 0, 6000)];
    let out = simulate_snowball(&props, Decimal::ZERO, SnowballStrategy::Smallest);

    assert!(!out.result.all_paid_off);
    assert_eq!(out.result.months_to_debt_free, 1200);
    assert!(out.warnings.iter().any(|w| w.contains("decimal range")));
    assert!(out.warnings.iter().any(|w| w.contains("runaway")));
}

#[test]
fn test_serviced_debt_has_no_range_warning() {
    let props = vec![property("porto", 60_000, 400, 150, 400)];
    let out = simulate_snowball(&props, dec!(300), SnowballStrategy::Smallest);
    assert!(out.result.all_paid_off);
    assert!(!out.warnings.iter().any(|w| w.contains("decimal range")));
}

// ---------------------------------------------------------------------------
// Monotonicity
// ---------------------------------------------------------------------------

fn arb_property(idx: usize) -> impl Strategy<Value = SnowballProperty> {
    (1_000i64..200_000, 50i64..2_000, -200i64..800, 0i64..600).prop_map(
        move |(debt, payment, cashflow, rate_bp)| {
            property(&format!("p{idx}"), debt, payment, cashflow, rate_bp)
        },
    )
}

fn arb_portfolio() -> impl Strategy<Value = Vec<SnowballProperty>> {
    (1usize..=4).prop_flat_map(|n| {
        (0..n)
            .map(arb_property)
            .collect::<Vec<_>>()
    })
}

fn arb_strategy() -> impl Strategy<Value = SnowballStrategy> {
    prop_oneof![
        Just(SnowballStrategy::Smallest),
        Just(SnowballStrategy::HighestInterest),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    /// A debt-free candidate with positive cashflow never delays anything.
    #[test]
    fn prop_surplus_candidate_never_delays(
        props in arb_portfolio(),
        surplus in 1i64..2_000,
        extra in 0i64..1_000,
        strategy in arb_strategy(),
    ) {
        let candidate = property("candidate", 0, 0, surplus, 0);
        let out = compare_candidate(&props, &candidate, Decimal::from(extra), strategy).result;
        for delta in &out.deltas {
            prop_assert!(delta.months_with <= delta.months_without, "{:?}", delta);
        }
    }

    /// An indebted candidate without cashflow never speeds anything up.
    #[test]
    fn prop_debt_only_candidate_never_accelerates(
        props in arb_portfolio(),
        debt in 1i64..100_000,
        payment in 0i64..1_000,
        extra in 0i64..1_000,
        strategy in arb_strategy(),
    ) {
        let candidate = property("candidate", debt, payment, 0, 300);
        let out = compare_candidate(&props, &candidate, Decimal::from(extra), strategy).result;
        for delta in &out.deltas {
            prop_assert!(delta.months_with >= delta.months_without, "{:?}", delta);
        }
    }

    /// More extra cash never delays any payoff.
    #[test]
    fn prop_extra_cash_monotone(
        props in arb_portfolio(),
        extra in 0i64..1_000,
        more in 1i64..1_000,
    ) {
        let base = simulate_snowball(&props, Decimal::from(extra), SnowballStrategy::Smallest).result;
        let boosted = simulate_snowball(&props, Decimal::from(extra + more), SnowballStrategy::Smallest).result;
        for (b, a) in base.payoffs.iter().zip(boosted.payoffs.iter()) {
            prop_assert!(a.months_to_payoff <= b.months_to_payoff);
        }
    }
}

use pretty_assertions::assert_eq;
use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use vastgoed_core::investment::multi_unit::{
    analyze_multi_unit, check_cost_shares, EnergyLabel, ExitDebtModel, MultiUnitInputs,
    RentalTaxProfile, SharedCosts, TenantType, UnitInput,
};
use vastgoed_core::mortgage::{Financing, LoanSizing, PaymentMode};
use vastgoed_core::tax::irs::IrsRegime;

fn unit(name: &str, rent: Decimal, share: Decimal) -> UnitInput {
    UnitInput {
        name: name.into(),
        area_m2: dec!(45),
        monthly_rent: rent,
        cost_share_pct: share,
        energy_label: EnergyLabel::D,
        tenant_type: TenantType::Professional,
        occupancy_pct: dec!(100),
        renovation_score: 5,
    }
}

fn building(units: Vec<UnitInput>) -> MultiUnitInputs {
    MultiUnitInputs {
        purchase_price: dec!(600000),
        transfer_tax: dec!(36000),
        notary_fees: dec!(5000),
        renovation_costs: dec!(20000),
        financing: Financing {
            sizing: LoanSizing::Ltv { ltv_pct: dec!(70) },
            interest_rate_pct: dec!(3.8),
            term_years: 30,
            payment: PaymentMode::Annuity,
        },
        shared_costs: SharedCosts {
            gas_monthly: dec!(90),
            water_monthly: dec!(45),
            vve_monthly: dec!(150),
            maintenance_yearly: dec!(2500),
            insurance_yearly: dec!(700),
        },
        tax: RentalTaxProfile {
            tax_year: 2026,
            ..Default::default()
        },
        exit_debt: ExitDebtModel::default(),
        units,
    }
}

#[test]
fn test_four_unit_building() {
    let inputs = building(vec![
        unit("0A", dec!(950), dec!(25)),
        unit("0B", dec!(950), dec!(25)),
        unit("1A", dec!(1050), dec!(25)),
        unit("1B", dec!(1050), dec!(25)),
    ]);
    let out = analyze_multi_unit(&inputs);

    assert!(out.warnings.is_empty(), "{:?}", out.warnings);
    let r = out.result;
    assert_eq!(r.total_investment, dec!(661000));
    assert_eq!(r.loan_amount, dec!(420000));
    assert_eq!(r.own_capital, dec!(241000));
    assert_eq!(r.irs_regime, IrsRegime::RentThreshold);
    assert_eq!(r.totals.gross_rent_monthly, dec!(4000));
    assert_eq!(r.units.len(), 4);
    assert_eq!(r.metrics.renovation_estimate_3y, dec!(10000));
    assert_eq!(r.metrics.average_occupancy_pct, dec!(100));
}

#[test]
fn test_occupancy_scales_rent() {
    let mut a = unit("A", dec!(1000), dec!(50));
    a.occupancy_pct = dec!(90);
    let inputs = building(vec![a, unit("B", dec!(1000), dec!(50))]);
    let r = analyze_multi_unit(&inputs).result;
    assert_eq!(r.units[0].gross_rent_monthly, dec!(900));
    assert_eq!(r.metrics.average_occupancy_pct, dec!(95));
}

#[test]
fn test_out_of_range_renovation_score_clamped() {
    let mut a = unit("A", dec!(1000), dec!(100));
    a.renovation_score = 14;
    let out = analyze_multi_unit(&building(vec![a]));
    assert_eq!(out.result.metrics.average_renovation_score, dec!(10));
    assert!(out.warnings.iter().any(|w| w.contains("renovation score")));
}

#[test]
fn test_high_average_rent_switches_rate() {
    let inputs = building(vec![
        unit("A", dec!(2400), dec!(50)),
        unit("B", dec!(2400), dec!(50)),
    ]);
    let r = analyze_multi_unit(&inputs).result;
    assert_eq!(r.irs_rate_pct, dec!(25));
}

#[test]
fn test_cost_share_check_tolerance() {
    let units = vec![
        unit("A", dec!(1000), dec!(33.33)),
        unit("B", dec!(1000), dec!(33.33)),
        unit("C", dec!(1000), dec!(33.34)),
    ];
    assert!(check_cost_shares(&units).balanced);

    let short = vec![unit("A", dec!(1000), dec!(50)), unit("B", dec!(1000), dec!(49))];
    let check = check_cost_shares(&short);
    assert!(!check.balanced);
    assert!(check.warning().is_some());
}

// ---------------------------------------------------------------------------
// Allocation conservation
// ---------------------------------------------------------------------------

/// Integer shares that add up to exactly 100.
fn arb_shares() -> impl Strategy<Value = Vec<Decimal>> {
    proptest::collection::vec(1i64..=20, 0..5).prop_map(|mut head| {
        let rest = 100 - head.iter().sum::<i64>();
        head.push(rest);
        head.into_iter().map(Decimal::from).collect()
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    /// With balanced shares, allocated costs and mortgage shares add back up
    /// to the property totals.
    #[test]
    fn prop_allocation_conserves_totals(
        shares in arb_shares(),
        rent in 300i64..3_000,
        maintenance in 0i64..10_000,
    ) {
        let units: Vec<UnitInput> = shares
            .iter()
            .enumerate()
            .map(|(i, s)| unit(&format!("U{i}"), Decimal::from(rent), *s))
            .collect();
        let mut inputs = building(units);
        inputs.shared_costs.maintenance_yearly = Decimal::from(maintenance);

        let r = analyze_multi_unit(&inputs).result;
        let tolerance = dec!(0.0000001);

        prop_assert!(r.cost_shares.balanced);
        prop_assert!((r.totals.allocated_costs_monthly - r.totals.shared_costs_monthly).abs() < tolerance);

        let mortgage: Decimal = r.units.iter().map(|u| u.mortgage_share_monthly).sum();
        prop_assert!((mortgage - r.monthly_payment).abs() < tolerance);

        prop_assert!(
            (r.totals.noi_monthly - (r.totals.gross_rent_monthly - r.totals.shared_costs_monthly)).abs()
                < tolerance
        );
        for u in &r.units {
            prop_assert!(u.tax_monthly >= Decimal::ZERO);
        }
    }
}

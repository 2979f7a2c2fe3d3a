//! Property-based tests for the analytics invariants.
//!
//! - NPV and IRR are pure functions of their inputs
//! - A single-period project discounts as `cf / (1 + r/100)^year`
//! - IRR recovers the rate a project was constructed from

use minekit_analytics::prelude::*;
use proptest::prelude::*;

fn single_period(year: f64, revenue: f64, discount: f64) -> CashFlowProject {
    CashFlowProject::from_rows(
        vec![CashFlowRow::new(year).with_revenue(revenue)],
        0.0,
        discount,
    )
    .unwrap()
}

proptest! {
    #[test]
    fn prop_single_period_npv(
        year in 0u32..30,
        revenue in -1e6f64..1e6,
        discount in -50.0f64..200.0,
    ) {
        let project = single_period(f64::from(year), revenue, discount);
        let expected = revenue / (1.0 + discount / 100.0).powf(f64::from(year));

        let npv = project.npv();

        prop_assert!((npv - expected).abs() <= 1e-9 * (1.0 + expected.abs()));
    }

    #[test]
    fn prop_npv_is_repeatable(
        flows in prop::collection::vec(-1e5f64..1e5, 1..20),
        discount in 0.0f64..50.0,
        tax in 0.0f64..60.0,
    ) {
        let rows = flows
            .iter()
            .zip(0u32..)
            .map(|(cf, t)| CashFlowRow::new(f64::from(t)).with_revenue(*cf))
            .collect();
        let project = CashFlowProject::from_rows(rows, tax, discount).unwrap();

        prop_assert_eq!(project.npv().to_bits(), project.npv().to_bits());
    }

    #[test]
    fn prop_irr_recovers_constructed_rate(
        target in 1.0f64..40.0,
        inflows in prop::collection::vec(100.0f64..1000.0, 2..8),
    ) {
        let base = 1.0 + target / 100.0;
        let investment: f64 = inflows
            .iter()
            .zip(1i32..)
            .map(|(cf, t)| cf / base.powi(t))
            .sum();
        let mut rows = vec![CashFlowRow::new(0.0).with_capital_cost(investment)];
        rows.extend(
            (1i32..)
                .zip(&inflows)
                .map(|(t, cf)| CashFlowRow::new(f64::from(t)).with_revenue(*cf)),
        );
        let project = CashFlowProject::from_rows(rows, 0.0, 10.0).unwrap();

        let result = project.irr().unwrap();

        prop_assert!(result.is_converged());
        prop_assert!((result.rate - target).abs() <= 0.01);
    }
}

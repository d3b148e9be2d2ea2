//! Tests for the inventory turnover analysis

use proptest::prelude::*;
use rust_decimal::Decimal;
use shared::{
    classify_health, days_sales_of_inventory, recommend_action, turnover_ratio, StockHealth,
};

/// Helper to create Decimal from string
fn dec(s: &str) -> Decimal {
    s.parse().unwrap()
}

mod ratio {
    use super::*;

    #[test]
    fn ratio_is_cogs_over_inventory_value() {
        assert_eq!(turnover_ratio(dec("300"), dec("150")), dec("2"));
    }

    #[test]
    fn zero_inventory_value_yields_zero_ratio() {
        assert_eq!(turnover_ratio(dec("300"), Decimal::ZERO), Decimal::ZERO);
    }

    #[test]
    fn negative_inventory_value_yields_zero_ratio() {
        assert_eq!(turnover_ratio(dec("300"), dec("-10")), Decimal::ZERO);
    }
}

mod dsi {
    use super::*;

    #[test]
    fn no_sales_means_undefined_not_zero() {
        assert_eq!(days_sales_of_inventory(dec("500"), Decimal::ZERO, 90), None);
        assert_ne!(days_sales_of_inventory(dec("500"), Decimal::ZERO, 90), Some(0));
    }

    #[test]
    fn dsi_scales_with_the_period() {
        assert_eq!(days_sales_of_inventory(dec("100"), dec("100"), 30), Some(30));
        assert_eq!(days_sales_of_inventory(dec("100"), dec("100"), 365), Some(365));
    }

    #[test]
    fn dsi_rounds_half_days() {
        // (1 / 3) x 90 = 30
        assert_eq!(days_sales_of_inventory(dec("1"), dec("3"), 90), Some(30));
        // (2 / 3) x 90 = 60
        assert_eq!(days_sales_of_inventory(dec("2"), dec("3"), 90), Some(60));
        // Midpoints round away from zero: (1 / 4) x 90 = 22.5
        assert_eq!(days_sales_of_inventory(dec("1"), dec("4"), 90), Some(23));
    }

    #[test]
    fn zero_inventory_with_sales_is_zero_days() {
        assert_eq!(days_sales_of_inventory(Decimal::ZERO, dec("400"), 90), Some(0));
    }
}

mod health {
    use super::*;

    #[test]
    fn stagnant_without_sales() {
        assert_eq!(classify_health(Decimal::ZERO), StockHealth::Stagnant);
    }

    #[test]
    fn slow_moving_below_half() {
        assert_eq!(classify_health(dec("0.25")), StockHealth::SlowMoving);
        assert_eq!(classify_health(dec("0.499")), StockHealth::SlowMoving);
    }

    #[test]
    fn healthy_from_half_to_three_inclusive() {
        assert_eq!(classify_health(dec("0.5")), StockHealth::Healthy);
        assert_eq!(classify_health(dec("1.7")), StockHealth::Healthy);
        assert_eq!(classify_health(dec("3")), StockHealth::Healthy);
    }

    #[test]
    fn fast_moving_above_three() {
        assert_eq!(classify_health(dec("3.001")), StockHealth::FastMoving);
        assert_eq!(classify_health(dec("12")), StockHealth::FastMoving);
    }
}

mod recommendations {
    use super::*;

    #[test]
    fn fast_mover_recommendation_depends_on_stock() {
        assert_eq!(
            recommend_action(StockHealth::FastMoving, 3),
            "Increase order quantity"
        );
        assert_eq!(
            recommend_action(StockHealth::FastMoving, 40),
            "Maintain current ordering"
        );
    }

    #[test]
    fn stagnant_stock_suggests_clearance() {
        assert_eq!(
            recommend_action(StockHealth::Stagnant, 0),
            "Consider clearance pricing or discontinuation"
        );
    }
}

mod product_exclusion {
    use super::*;

    /// Mirrors the report's inclusion rule for costed products
    fn included(cost_price: Option<Decimal>) -> bool {
        matches!(cost_price, Some(cost) if cost > Decimal::ZERO)
    }

    #[test]
    fn products_without_usable_cost_are_excluded() {
        assert!(!included(None));
        assert!(!included(Some(Decimal::ZERO)));
        assert!(!included(Some(dec("-1"))));
        assert!(included(Some(dec("0.01"))));
    }
}

mod property_tests {
    use super::*;

    fn money_strategy() -> impl Strategy<Value = Decimal> {
        (0u32..10_000_000).prop_map(|cents| Decimal::new(cents as i64, 2))
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// Ratio, DSI and health never produce undefined arithmetic for any
        /// combination of inputs including zero denominators
        #[test]
        fn prop_metrics_are_total_functions(
            cogs in money_strategy(),
            inventory_value in money_strategy(),
            period_days in 1i64..730
        ) {
            let ratio = turnover_ratio(cogs, inventory_value);
            prop_assert!(ratio >= Decimal::ZERO);

            let dsi = days_sales_of_inventory(inventory_value, cogs, period_days);
            match dsi {
                Some(days) => prop_assert!(days >= 0),
                None => prop_assert!(cogs <= Decimal::ZERO),
            }

            // Classification accepts any ratio the ratio function produces
            let _ = classify_health(ratio);
        }

        /// Exactly one health bucket matches every ratio
        #[test]
        fn prop_health_buckets_are_exhaustive_and_exclusive(
            cents in -1_000_000i64..100_000_000
        ) {
            let ratio = Decimal::new(cents, 2);
            let health = classify_health(ratio);

            let expected = if ratio <= Decimal::ZERO {
                StockHealth::Stagnant
            } else if ratio < dec("0.5") {
                StockHealth::SlowMoving
            } else if ratio <= dec("3") {
                StockHealth::Healthy
            } else {
                StockHealth::FastMoving
            };
            prop_assert_eq!(health, expected);
        }

        /// DSI is positive whenever both inventory value and sales are
        #[test]
        fn prop_dsi_positive_for_positive_inputs(
            value_cents in 1u32..10_000_000,
            cogs_cents in 1u32..10_000_000,
            period_days in 1i64..730
        ) {
            let inventory_value = Decimal::new(value_cents as i64, 2);
            let cogs = Decimal::new(cogs_cents as i64, 2);

            let dsi = days_sales_of_inventory(inventory_value, cogs, period_days);
            prop_assert!(dsi.is_some());
        }

        /// Every health bucket maps to a recommendation for any stock level
        #[test]
        fn prop_recommendations_are_total(
            cents in 0i64..10_000_000,
            stock in 0i64..100_000
        ) {
            let health = classify_health(Decimal::new(cents, 2));
            let action = recommend_action(health, stock);
            prop_assert!(!action.is_empty());
        }
    }
}

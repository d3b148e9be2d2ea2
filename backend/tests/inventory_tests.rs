//! Tests for the stock movement ledger invariants

use proptest::prelude::*;
use shared::{
    movement_reconciles, validate_movement_delta, validate_quantity_positive, MovementType,
};

/// In-memory replay of the ledger recording rule: apply a delta to the
/// running level, rejecting anything that would drive it negative
fn apply(level: i64, delta: i64) -> Result<(i64, i64), &'static str> {
    validate_movement_delta(delta)?;
    let new = level + delta;
    if new < 0 {
        return Err("insufficient stock");
    }
    Ok((level, new))
}

mod ledger {
    use super::*;

    #[test]
    fn entry_carries_previous_and_new_quantities() {
        let (previous, new) = apply(10, -4).unwrap();
        assert_eq!(previous, 10);
        assert_eq!(new, 6);
        assert!(movement_reconciles(previous, -4, new));
    }

    #[test]
    fn movements_that_overdraw_stock_are_rejected() {
        assert!(apply(5, -6).is_err());
        assert!(apply(0, -1).is_err());
    }

    #[test]
    fn draining_stock_to_exactly_zero_is_allowed() {
        let (previous, new) = apply(5, -5).unwrap();
        assert_eq!(previous, 5);
        assert_eq!(new, 0);
    }

    #[test]
    fn zero_deltas_are_rejected_before_reaching_the_ledger() {
        assert!(apply(10, 0).is_err());
    }
}

mod movement_types {
    use super::*;

    #[test]
    fn names_round_trip_through_parse() {
        for mt in [
            MovementType::Purchase,
            MovementType::Sale,
            MovementType::Adjustment,
            MovementType::StockCount,
            MovementType::Return,
            MovementType::Initial,
            MovementType::PurchaseOrderReceive,
            MovementType::PurchaseOrderPartial,
        ] {
            assert_eq!(MovementType::parse(mt.as_str()), Some(mt));
        }
    }

    #[test]
    fn unknown_names_are_not_silently_coerced() {
        assert_eq!(MovementType::parse("teleport"), None);
        assert_eq!(MovementType::parse(""), None);
    }
}

mod batch_receipts {
    use super::*;

    #[test]
    fn receipts_require_positive_quantities() {
        assert!(validate_quantity_positive(1).is_ok());
        assert!(validate_quantity_positive(0).is_err());
        assert!(validate_quantity_positive(-4).is_err());
    }
}

mod property_tests {
    use super::*;

    fn delta_strategy() -> impl Strategy<Value = i64> {
        prop_oneof![(-200i64..0), (1i64..200)]
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// Replaying any accepted sequence of movements keeps the stock level
        /// non-negative and every entry reconciled
        #[test]
        fn prop_ledger_replay_never_goes_negative(
            initial in 0i64..500,
            deltas in prop::collection::vec(delta_strategy(), 0..50)
        ) {
            let mut level = initial;
            for delta in deltas {
                match apply(level, delta) {
                    Ok((previous, new)) => {
                        prop_assert!(new >= 0);
                        prop_assert!(movement_reconciles(previous, delta, new));
                        prop_assert_eq!(previous, level);
                        level = new;
                    }
                    Err(_) => {
                        // Rejected movements leave the level untouched
                        prop_assert!(level + delta < 0);
                    }
                }
            }
        }

        /// The final stock level equals the initial level plus the sum of
        /// accepted deltas
        #[test]
        fn prop_level_equals_initial_plus_accepted_deltas(
            initial in 0i64..500,
            deltas in prop::collection::vec(delta_strategy(), 0..50)
        ) {
            let mut level = initial;
            let mut accepted_sum = 0i64;
            for delta in deltas {
                if let Ok((_, new)) = apply(level, delta) {
                    accepted_sum += delta;
                    level = new;
                }
            }
            prop_assert_eq!(level, initial + accepted_sum);
        }
    }
}

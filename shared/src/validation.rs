//! Validation utilities for the StockTrack platform

use rust_decimal::Decimal;

// ============================================================================
// Catalog Validations
// ============================================================================

/// Validate SKU format (3-32 chars, uppercase alphanumeric plus dashes)
pub fn validate_sku(sku: &str) -> Result<(), &'static str> {
    if sku.len() < 3 {
        return Err("SKU must be at least 3 characters");
    }
    if sku.len() > 32 {
        return Err("SKU must be at most 32 characters");
    }
    if !sku
        .chars()
        .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || c == '-')
    {
        return Err("SKU must be uppercase alphanumeric with optional dashes");
    }
    Ok(())
}

/// Validate a monetary amount is non-negative
pub fn validate_price(price: Decimal) -> Result<(), &'static str> {
    if price < Decimal::ZERO {
        return Err("Price cannot be negative");
    }
    Ok(())
}

// ============================================================================
// Inventory Validations
// ============================================================================

/// Validate a received quantity is strictly positive
pub fn validate_quantity_positive(quantity: i64) -> Result<(), &'static str> {
    if quantity <= 0 {
        return Err("Quantity must be positive");
    }
    Ok(())
}

/// Validate a movement delta is non-zero
pub fn validate_movement_delta(delta: i64) -> Result<(), &'static str> {
    if delta == 0 {
        return Err("Quantity change cannot be zero");
    }
    Ok(())
}

/// Check that a ledger entry reconciles with its surrounding quantities
pub fn movement_reconciles(previous: i64, change: i64, new: i64) -> bool {
    previous + change == new
}

// ============================================================================
// Reporting Validations
// ============================================================================

/// Validate an analysis period length (1 day to 2 years)
pub fn validate_period_days(days: i64) -> Result<(), &'static str> {
    if days < 1 {
        return Err("Analysis period must be at least 1 day");
    }
    if days > 730 {
        return Err("Analysis period must be at most 730 days");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sku_format() {
        assert!(validate_sku("HW-BOLT-M8").is_ok());
        assert!(validate_sku("AB").is_err());
        assert!(validate_sku("lower-case").is_err());
        assert!(validate_sku("HAS SPACE").is_err());
    }

    #[test]
    fn movement_deltas() {
        assert!(validate_movement_delta(-3).is_ok());
        assert!(validate_movement_delta(0).is_err());
    }

    #[test]
    fn ledger_reconciliation() {
        assert!(movement_reconciles(10, -4, 6));
        assert!(!movement_reconciles(10, -4, 7));
    }

    #[test]
    fn period_bounds() {
        assert!(validate_period_days(1).is_ok());
        assert!(validate_period_days(730).is_ok());
        assert!(validate_period_days(0).is_err());
        assert!(validate_period_days(731).is_err());
    }

    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #![proptest_config(ProptestConfig::with_cases(100))]

            #[test]
            fn prop_reconciliation_matches_arithmetic(
                previous in -10_000i64..10_000,
                change in -10_000i64..10_000
            ) {
                prop_assert!(movement_reconciles(previous, change, previous + change));
                prop_assert!(!movement_reconciles(previous, change, previous + change + 1));
            }
        }
    }
}

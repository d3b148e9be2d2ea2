//! Inventory turnover analysis
//!
//! Computes turnover ratio, Days Sales of Inventory (DSI) and a qualitative
//! health classification from a product's inventory value and its cost of
//! goods sold over an analysis period. Zero denominators are special-cased:
//! zero inventory value gives a zero ratio, and zero COGS gives an undefined
//! (None) DSI, which is deliberately distinct from a DSI of zero.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// Default analysis period in days
pub const DEFAULT_PERIOD_DAYS: i64 = 90;

/// Fast movers at or below this stock level warrant larger orders
pub const FAST_MOVER_LOW_STOCK: i64 = 10;

/// Qualitative turnover health bucket
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StockHealth {
    /// No sales in the period
    Stagnant,
    /// Turnover ratio below 0.5
    SlowMoving,
    /// Turnover ratio between 0.5 and 3 inclusive
    Healthy,
    /// Turnover ratio above 3
    FastMoving,
}

impl std::fmt::Display for StockHealth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StockHealth::Stagnant => write!(f, "Stagnant"),
            StockHealth::SlowMoving => write!(f, "Slow-moving"),
            StockHealth::Healthy => write!(f, "Healthy"),
            StockHealth::FastMoving => write!(f, "Fast-moving"),
        }
    }
}

/// Turnover ratio: COGS over inventory value, zero when there is no
/// inventory value to divide by
pub fn turnover_ratio(cogs: Decimal, inventory_value: Decimal) -> Decimal {
    if inventory_value <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    cogs.max(Decimal::ZERO) / inventory_value
}

/// Days Sales of Inventory: estimated days to sell through current stock
///
/// Returns `None` when there were no sales in the period. A product that has
/// not sold has an undefined DSI, not a DSI of zero. Half days round away
/// from zero (22.5 becomes 23).
pub fn days_sales_of_inventory(
    inventory_value: Decimal,
    cogs: Decimal,
    period_days: i64,
) -> Option<i64> {
    if cogs <= Decimal::ZERO {
        return None;
    }
    let days = (inventory_value.max(Decimal::ZERO) / cogs * Decimal::from(period_days))
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
    days.to_i64()
}

/// Classify turnover health; first matching bucket wins
pub fn classify_health(ratio: Decimal) -> StockHealth {
    if ratio <= Decimal::ZERO {
        StockHealth::Stagnant
    } else if ratio < Decimal::new(5, 1) {
        StockHealth::SlowMoving
    } else if ratio <= Decimal::from(3) {
        StockHealth::Healthy
    } else {
        StockHealth::FastMoving
    }
}

/// Deterministic action recommendation from health and stock level
pub fn recommend_action(health: StockHealth, stock_level: i64) -> &'static str {
    match health {
        StockHealth::Stagnant => "Consider clearance pricing or discontinuation",
        StockHealth::SlowMoving => "Reduce stock levels or run promotions",
        StockHealth::FastMoving if stock_level < FAST_MOVER_LOW_STOCK => {
            "Increase order quantity"
        }
        StockHealth::FastMoving => "Maintain current ordering",
        StockHealth::Healthy => "Stock levels appropriate",
    }
}

//! Inventory valuation engine
//!
//! Values a product's on-hand stock under a chosen costing method, given its
//! batch lots (ordered by receipt date) or a fallback unit cost. All outputs
//! are finite, non-negative decimals; a zero stock level yields a zero unit
//! value rather than a division error, so aggregate reports never see
//! undefined arithmetic.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::ValuationMethod;

/// A batch lot as seen by the valuation engine
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchLot {
    pub quantity: i64,
    pub cost_per_unit: Decimal,
    pub received_date: NaiveDate,
}

/// Computed value of one product's stock
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ItemValue {
    pub total_value: Decimal,
    pub unit_value: Decimal,
}

/// Value band for the distribution histogram
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueBand {
    /// total value > 5000
    High,
    /// 1000 < total value <= 5000
    Medium,
    /// 100 <= total value <= 1000
    Standard,
    /// total value < 100
    Low,
}

impl std::fmt::Display for ValueBand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValueBand::High => write!(f, "High"),
            ValueBand::Medium => write!(f, "Medium"),
            ValueBand::Standard => write!(f, "Standard"),
            ValueBand::Low => write!(f, "Low"),
        }
    }
}

/// Value a product's stock under the given costing method
///
/// `batches` must be ordered by `received_date` ascending (oldest first).
/// `fallback_unit_cost` is the catalog cost price, used when no usable batch
/// data exists. A negative stock level is treated as zero.
pub fn value_inventory(
    method: ValuationMethod,
    stock_level: i64,
    batches: &[BatchLot],
    fallback_unit_cost: Decimal,
) -> ItemValue {
    let stock = stock_level.max(0);
    let fallback = fallback_unit_cost.max(Decimal::ZERO);

    match method {
        ValuationMethod::Fifo => fifo_value(stock, batches, fallback),
        ValuationMethod::WeightedAverage => weighted_average_value(stock, batches, fallback),
        ValuationMethod::SpecificIdentification => {
            specific_identification_value(stock, batches, fallback)
        }
    }
}

/// FIFO: consume the oldest batches first, up to the current stock level
fn fifo_value(stock: i64, batches: &[BatchLot], fallback: Decimal) -> ItemValue {
    if batches.is_empty() {
        return from_unit_cost(stock, fallback);
    }

    let mut remaining = stock;
    let mut total = Decimal::ZERO;
    for batch in batches {
        if remaining == 0 {
            break;
        }
        let consumed = batch.quantity.max(0).min(remaining);
        total += Decimal::from(consumed) * batch.cost_per_unit.max(Decimal::ZERO);
        remaining -= consumed;
    }

    ItemValue {
        total_value: total,
        unit_value: per_unit(total, stock),
    }
}

/// Weighted average over all batches, independent of the current stock level
fn weighted_average_value(stock: i64, batches: &[BatchLot], fallback: Decimal) -> ItemValue {
    let total_quantity: i64 = batches.iter().map(|b| b.quantity.max(0)).sum();
    if total_quantity == 0 {
        return from_unit_cost(stock, fallback);
    }

    let total_cost: Decimal = batches
        .iter()
        .filter(|b| b.quantity > 0)
        .map(|b| Decimal::from(b.quantity) * b.cost_per_unit.max(Decimal::ZERO))
        .sum();
    let unit = total_cost / Decimal::from(total_quantity);

    ItemValue {
        total_value: Decimal::from(stock) * unit,
        unit_value: unit,
    }
}

/// Specific identification: each remaining lot carries its own cost
fn specific_identification_value(stock: i64, batches: &[BatchLot], fallback: Decimal) -> ItemValue {
    let lot_quantity: i64 = batches.iter().map(|b| b.quantity.max(0)).sum();
    if lot_quantity == 0 {
        return from_unit_cost(stock, fallback);
    }

    let total: Decimal = batches
        .iter()
        .filter(|b| b.quantity > 0)
        .map(|b| Decimal::from(b.quantity) * b.cost_per_unit.max(Decimal::ZERO))
        .sum();

    ItemValue {
        total_value: total,
        unit_value: per_unit(total, stock),
    }
}

fn from_unit_cost(stock: i64, unit_cost: Decimal) -> ItemValue {
    ItemValue {
        total_value: Decimal::from(stock) * unit_cost,
        unit_value: unit_cost,
    }
}

fn per_unit(total: Decimal, stock: i64) -> Decimal {
    if stock > 0 {
        total / Decimal::from(stock)
    } else {
        Decimal::ZERO
    }
}

/// Bucket an item's total value into the distribution histogram
pub fn value_band(total_value: Decimal) -> ValueBand {
    if total_value > Decimal::from(5000) {
        ValueBand::High
    } else if total_value > Decimal::from(1000) {
        ValueBand::Medium
    } else if total_value >= Decimal::from(100) {
        ValueBand::Standard
    } else {
        ValueBand::Low
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn lot(quantity: i64, cost: &str, day: u32) -> BatchLot {
        BatchLot {
            quantity,
            cost_per_unit: dec(cost),
            received_date: NaiveDate::from_ymd_opt(2025, 1, day).unwrap(),
        }
    }

    #[test]
    fn fifo_consumes_oldest_batches_first() {
        let batches = [lot(10, "2", 1), lot(5, "3", 15)];
        let value = value_inventory(ValuationMethod::Fifo, 12, &batches, dec("9"));

        // 10 x 2 + 2 x 3 = 26
        assert_eq!(value.total_value, dec("26"));
        assert_eq!(value.unit_value, dec("26") / dec("12"));
    }

    #[test]
    fn fifo_falls_back_to_cost_price_without_batches() {
        let value = value_inventory(ValuationMethod::Fifo, 7, &[], dec("4.5"));
        assert_eq!(value.total_value, dec("31.5"));
        assert_eq!(value.unit_value, dec("4.5"));
    }

    #[test]
    fn weighted_average_ignores_stock_level_for_unit_cost() {
        let batches = [lot(10, "2", 1), lot(5, "3", 15)];
        let expected_unit = dec("35") / dec("15");

        for stock in [0i64, 3, 12, 100] {
            let value = value_inventory(ValuationMethod::WeightedAverage, stock, &batches, dec("9"));
            assert_eq!(value.unit_value, expected_unit);
            assert_eq!(value.total_value, Decimal::from(stock) * expected_unit);
        }
    }

    #[test]
    fn weighted_average_degrades_when_batch_quantity_is_zero() {
        let batches = [lot(0, "2", 1)];
        let value = value_inventory(ValuationMethod::WeightedAverage, 4, &batches, dec("6"));
        assert_eq!(value.total_value, dec("24"));
        assert_eq!(value.unit_value, dec("6"));
    }

    #[test]
    fn specific_identification_sums_positive_lots() {
        let batches = [lot(10, "2", 1), lot(0, "99", 10), lot(5, "3", 15)];
        let value = value_inventory(ValuationMethod::SpecificIdentification, 15, &batches, dec("9"));
        assert_eq!(value.total_value, dec("35"));
        assert_eq!(value.unit_value, dec("35") / dec("15"));
    }

    #[test]
    fn zero_stock_yields_zero_unit_value_not_an_error() {
        let batches = [lot(10, "2", 1)];
        let value = value_inventory(ValuationMethod::Fifo, 0, &batches, dec("9"));
        assert_eq!(value.total_value, Decimal::ZERO);
        assert_eq!(value.unit_value, Decimal::ZERO);
    }

    #[test]
    fn negative_stock_is_treated_as_zero() {
        let value = value_inventory(ValuationMethod::Fifo, -5, &[], dec("9"));
        assert_eq!(value.total_value, Decimal::ZERO);
        assert_eq!(value.unit_value, dec("9"));
    }

    #[test]
    fn value_band_boundaries() {
        assert_eq!(value_band(dec("5000.01")), ValueBand::High);
        assert_eq!(value_band(dec("5000")), ValueBand::Medium);
        assert_eq!(value_band(dec("1000.01")), ValueBand::Medium);
        assert_eq!(value_band(dec("1000")), ValueBand::Standard);
        assert_eq!(value_band(dec("100")), ValueBand::Standard);
        assert_eq!(value_band(dec("99.99")), ValueBand::Low);
    }

    #[test]
    fn unknown_method_name_defaults_to_fifo() {
        assert_eq!(ValuationMethod::parse_or_default("lifo"), ValuationMethod::Fifo);
        assert_eq!(
            ValuationMethod::parse_or_default("weighted_average"),
            ValuationMethod::WeightedAverage
        );
    }
}

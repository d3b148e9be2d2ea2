//! Inventory record and batch lot models

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Per-product inventory state
///
/// One record per product. `stock_level` never goes below zero; adjustments
/// that would drive it negative are rejected at recording time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InventoryRecord {
    pub id: Uuid,
    pub product_id: Uuid,
    pub stock_level: i64,
    /// Reorder is suggested once stock falls to this level
    pub reorder_level: i64,
    pub optimal_level: i64,
    pub unit_of_measure: String,
    /// Reports default a missing zone to "Main Warehouse"
    pub warehouse_zone: Option<String>,
    pub preferred_valuation_method: ValuationMethod,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A received lot of a product with its own cost basis
///
/// Batches back FIFO and specific-identification valuation. Products without
/// batch history fall back to the catalog cost price.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InventoryBatch {
    pub id: Uuid,
    pub product_id: Uuid,
    pub quantity: i64,
    pub cost_per_unit: Decimal,
    pub received_date: NaiveDate,
    pub expiry_date: Option<NaiveDate>,
    pub reference_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

/// Costing method used when valuing inventory
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ValuationMethod {
    #[default]
    Fifo,
    WeightedAverage,
    SpecificIdentification,
}

impl ValuationMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            ValuationMethod::Fifo => "fifo",
            ValuationMethod::WeightedAverage => "weighted_average",
            ValuationMethod::SpecificIdentification => "specific_identification",
        }
    }

    /// Parse a method name; unknown names fall back to FIFO rather than
    /// failing the request.
    pub fn parse_or_default(s: &str) -> Self {
        match s {
            "weighted_average" => ValuationMethod::WeightedAverage,
            "specific_identification" => ValuationMethod::SpecificIdentification,
            _ => ValuationMethod::Fifo,
        }
    }
}

impl std::fmt::Display for ValuationMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

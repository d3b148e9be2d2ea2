//! Product catalog models

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A product in the catalog
///
/// `cost_price` is the reference cost basis used as the valuation fallback
/// when no batch lots exist for the product. A missing or non-positive cost
/// price excludes the product from turnover analysis entirely.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    pub id: Uuid,
    pub name: String,
    /// Stock keeping unit, unique per catalog (e.g., "HW-BOLT-M8")
    pub sku: String,
    pub category: String,
    pub cost_price: Option<Decimal>,
    pub sell_price: Decimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

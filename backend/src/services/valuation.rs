//! Inventory valuation service
//!
//! Prices the current stock of every product using FIFO, weighted average,
//! or specific identification, then rolls the per-item values up by
//! category and warehouse zone. The per-item math lives in the shared
//! crate; this service loads the rows and assembles the report.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use std::collections::{BTreeMap, HashMap};
use uuid::Uuid;

use crate::error::AppResult;
use crate::models::{value_band, value_inventory, BatchLot, ValuationMethod, ValueBand};

const DEFAULT_ZONE: &str = "Main Warehouse";

/// Valuation service for inventory value reporting
#[derive(Clone)]
pub struct ValuationService {
    db: PgPool,
}

/// Row joining a product to its inventory record
#[derive(Debug, FromRow)]
struct ValuationRow {
    product_id: Uuid,
    name: String,
    sku: String,
    category: String,
    cost_price: Option<Decimal>,
    stock_level: i64,
    warehouse_zone: Option<String>,
    preferred_valuation_method: String,
}

/// Row for batch lots feeding the valuation
#[derive(Debug, FromRow)]
struct LotRow {
    product_id: Uuid,
    quantity: i64,
    cost_per_unit: Decimal,
    received_date: chrono::NaiveDate,
}

/// Filters for the valuation report
#[derive(Debug, Default, Deserialize)]
pub struct ValuationFilter {
    pub category: Option<String>,
    pub warehouse_zone: Option<String>,
}

/// Valued line item in the report
#[derive(Debug, Serialize)]
pub struct ValuedItem {
    pub product_id: Uuid,
    pub name: String,
    pub sku: String,
    pub category: String,
    pub warehouse_zone: String,
    pub stock_level: i64,
    pub method: ValuationMethod,
    pub unit_value: Decimal,
    pub total_value: Decimal,
    pub value_band: ValueBand,
}

/// Item counts per value band
#[derive(Debug, Default, Serialize)]
pub struct ValueDistribution {
    pub high: u64,
    pub medium: u64,
    pub standard: u64,
    pub low: u64,
}

/// Full inventory valuation report
#[derive(Debug, Serialize)]
pub struct InventoryValueReport {
    pub method: Option<ValuationMethod>,
    pub total_value: Decimal,
    pub item_count: u64,
    pub items: Vec<ValuedItem>,
    pub category_breakdown: BTreeMap<String, Decimal>,
    pub location_breakdown: BTreeMap<String, Decimal>,
    pub value_distribution: ValueDistribution,
}

impl ValuationService {
    /// Create a new ValuationService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Calculate the current inventory value
    ///
    /// `method` overrides the per-record preferred method when given;
    /// otherwise each item is valued by its own preference.
    pub async fn calculate_inventory_value(
        &self,
        method: Option<ValuationMethod>,
        filter: &ValuationFilter,
    ) -> AppResult<InventoryValueReport> {
        let rows = sqlx::query_as::<_, ValuationRow>(
            r#"
            SELECT p.id as product_id, p.name, p.sku, p.category, p.cost_price,
                   r.stock_level, r.warehouse_zone, r.preferred_valuation_method
            FROM inventory_records r
            JOIN products p ON p.id = r.product_id
            WHERE ($1::text IS NULL OR p.category = $1)
              AND ($2::text IS NULL OR r.warehouse_zone = $2)
            ORDER BY p.name ASC
            "#,
        )
        .bind(&filter.category)
        .bind(&filter.warehouse_zone)
        .fetch_all(&self.db)
        .await?;

        let lot_rows = sqlx::query_as::<_, LotRow>(
            r#"
            SELECT product_id, quantity, cost_per_unit, received_date
            FROM inventory_batches
            WHERE quantity <> 0
            ORDER BY product_id, received_date ASC, created_at ASC
            "#,
        )
        .fetch_all(&self.db)
        .await?;

        let mut lots_by_product: HashMap<Uuid, Vec<BatchLot>> = HashMap::new();
        for lot in lot_rows {
            lots_by_product
                .entry(lot.product_id)
                .or_default()
                .push(BatchLot {
                    quantity: lot.quantity,
                    cost_per_unit: lot.cost_per_unit,
                    received_date: lot.received_date,
                });
        }

        let mut items = Vec::with_capacity(rows.len());
        let mut total_value = Decimal::ZERO;
        let mut category_breakdown: BTreeMap<String, Decimal> = BTreeMap::new();
        let mut location_breakdown: BTreeMap<String, Decimal> = BTreeMap::new();
        let mut distribution = ValueDistribution::default();

        for row in rows {
            let item_method = method.unwrap_or_else(|| {
                ValuationMethod::parse_or_default(&row.preferred_valuation_method)
            });
            let lots = lots_by_product
                .get(&row.product_id)
                .map(Vec::as_slice)
                .unwrap_or(&[]);
            let fallback = row.cost_price.unwrap_or(Decimal::ZERO);

            let value = value_inventory(item_method, row.stock_level, lots, fallback);
            let band = value_band(value.total_value);
            let zone = row
                .warehouse_zone
                .unwrap_or_else(|| DEFAULT_ZONE.to_string());

            total_value += value.total_value;
            *category_breakdown.entry(row.category.clone()).or_default() += value.total_value;
            *location_breakdown.entry(zone.clone()).or_default() += value.total_value;
            match band {
                ValueBand::High => distribution.high += 1,
                ValueBand::Medium => distribution.medium += 1,
                ValueBand::Standard => distribution.standard += 1,
                ValueBand::Low => distribution.low += 1,
            }

            items.push(ValuedItem {
                product_id: row.product_id,
                name: row.name,
                sku: row.sku,
                category: row.category,
                warehouse_zone: zone,
                stock_level: row.stock_level,
                method: item_method,
                unit_value: value.unit_value,
                total_value: value.total_value,
                value_band: band,
            });
        }

        items.sort_by(|a, b| b.total_value.cmp(&a.total_value));

        tracing::debug!(
            item_count = items.len(),
            %total_value,
            "Inventory valuation computed"
        );

        Ok(InventoryValueReport {
            method,
            total_value,
            item_count: items.len() as u64,
            items,
            category_breakdown,
            location_breakdown,
            value_distribution: distribution,
        })
    }
}

//! Inventory turnover analysis service
//!
//! Aggregates paid order lines over an analysis window into per-product
//! cost of goods sold, then derives turnover ratio, DSI, a health bucket
//! and an action recommendation for each product with a usable cost price.
//! Products without a positive cost price are excluded rather than reported
//! with meaningless zero-cost figures.

use chrono::{Duration, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::{FromRow, PgPool};
use std::collections::{BTreeMap, HashMap};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::models::{
    classify_health, days_sales_of_inventory, recommend_action, turnover_ratio, DateRange,
    StockHealth,
};

/// Turnover analysis service
#[derive(Clone)]
pub struct TurnoverService {
    db: PgPool,
}

/// Row joining a costed product to its inventory record
#[derive(Debug, FromRow)]
struct CostedProductRow {
    product_id: Uuid,
    name: String,
    sku: String,
    category: String,
    cost_price: Decimal,
    stock_level: i64,
}

/// Aggregated paid sales per product over the period
#[derive(Debug, FromRow)]
struct SalesRow {
    product_id: Uuid,
    units_sold: i64,
    cogs: Decimal,
}

/// Per-product turnover figures
#[derive(Debug, Serialize)]
pub struct ProductTurnover {
    pub product_id: Uuid,
    pub name: String,
    pub sku: String,
    pub category: String,
    pub stock_level: i64,
    pub inventory_value: Decimal,
    pub units_sold: i64,
    pub cogs: Decimal,
    pub turnover_ratio: Decimal,
    pub days_sales_of_inventory: Option<i64>,
    pub health: StockHealth,
    pub recommendation: &'static str,
}

/// Turnover figures rolled up by category, same formulas as per-product
#[derive(Debug, Serialize)]
pub struct CategoryTurnover {
    pub category: String,
    pub product_count: u64,
    pub stock_level: i64,
    pub inventory_value: Decimal,
    pub units_sold: i64,
    pub cogs: Decimal,
    pub turnover_ratio: Decimal,
    pub days_sales_of_inventory: Option<i64>,
    pub health: StockHealth,
}

/// Portfolio-level summary of the analysis
#[derive(Debug, Serialize)]
pub struct TurnoverSummary {
    pub period: DateRange,
    pub period_days: i64,
    pub product_count: u64,
    pub total_inventory_value: Decimal,
    pub total_units_sold: i64,
    pub total_cogs: Decimal,
    pub overall_turnover_ratio: Decimal,
    pub overall_days_sales_of_inventory: Option<i64>,
    pub stagnant_count: u64,
    pub slow_moving_count: u64,
    pub healthy_count: u64,
    pub fast_moving_count: u64,
}

/// Full turnover report
#[derive(Debug, Serialize)]
pub struct TurnoverReport {
    pub summary: TurnoverSummary,
    pub products: Vec<ProductTurnover>,
    pub categories: Vec<CategoryTurnover>,
}

#[derive(Debug, Default)]
struct CategoryAccumulator {
    product_count: u64,
    stock_level: i64,
    inventory_value: Decimal,
    units_sold: i64,
    cogs: Decimal,
}

impl TurnoverService {
    /// Create a new TurnoverService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Calculate the turnover report over a trailing window ending today
    pub async fn calculate_turnover_report(
        &self,
        period_days: i64,
        category: Option<&str>,
    ) -> AppResult<TurnoverReport> {
        shared::validate_period_days(period_days).map_err(|msg| AppError::Validation {
            field: "period_days".to_string(),
            message: msg.to_string(),
        })?;

        let period_end = Utc::now().date_naive();
        let period_start = period_end - Duration::days(period_days);

        let products = self.load_costed_products(category).await?;
        let sales = self.load_sales(period_start, period_end, category).await?;

        let mut sales_by_product: HashMap<Uuid, SalesRow> = HashMap::new();
        for row in sales {
            sales_by_product.insert(row.product_id, row);
        }

        let mut items = Vec::with_capacity(products.len());
        let mut categories: BTreeMap<String, CategoryAccumulator> = BTreeMap::new();
        let mut total_inventory_value = Decimal::ZERO;
        let mut total_units_sold = 0i64;
        let mut total_cogs = Decimal::ZERO;
        let mut health_counts = [0u64; 4];

        for product in products {
            let inventory_value = Decimal::from(product.stock_level.max(0)) * product.cost_price;
            let (units_sold, cogs) = sales_by_product
                .get(&product.product_id)
                .map(|s| (s.units_sold, s.cogs))
                .unwrap_or((0, Decimal::ZERO));

            let ratio = turnover_ratio(cogs, inventory_value);
            let dsi = days_sales_of_inventory(inventory_value, cogs, period_days);
            let health = classify_health(ratio);
            let recommendation = recommend_action(health, product.stock_level);

            total_inventory_value += inventory_value;
            total_units_sold += units_sold;
            total_cogs += cogs;
            match health {
                StockHealth::Stagnant => health_counts[0] += 1,
                StockHealth::SlowMoving => health_counts[1] += 1,
                StockHealth::Healthy => health_counts[2] += 1,
                StockHealth::FastMoving => health_counts[3] += 1,
            }

            let acc = categories.entry(product.category.clone()).or_default();
            acc.product_count += 1;
            acc.stock_level += product.stock_level.max(0);
            acc.inventory_value += inventory_value;
            acc.units_sold += units_sold;
            acc.cogs += cogs;

            items.push(ProductTurnover {
                product_id: product.product_id,
                name: product.name,
                sku: product.sku,
                category: product.category,
                stock_level: product.stock_level,
                inventory_value,
                units_sold,
                cogs,
                turnover_ratio: ratio,
                days_sales_of_inventory: dsi,
                health,
                recommendation,
            });
        }

        items.sort_by(|a, b| b.turnover_ratio.cmp(&a.turnover_ratio));

        let overall_ratio = turnover_ratio(total_cogs, total_inventory_value);
        let overall_dsi = days_sales_of_inventory(total_inventory_value, total_cogs, period_days);

        let summary = TurnoverSummary {
            period: DateRange {
                start: period_start,
                end: period_end,
            },
            period_days,
            product_count: items.len() as u64,
            total_inventory_value,
            total_units_sold,
            total_cogs,
            overall_turnover_ratio: overall_ratio,
            overall_days_sales_of_inventory: overall_dsi,
            stagnant_count: health_counts[0],
            slow_moving_count: health_counts[1],
            healthy_count: health_counts[2],
            fast_moving_count: health_counts[3],
        };

        let categories = categories
            .into_iter()
            .map(|(category, acc)| {
                let ratio = turnover_ratio(acc.cogs, acc.inventory_value);
                CategoryTurnover {
                    category,
                    product_count: acc.product_count,
                    stock_level: acc.stock_level,
                    inventory_value: acc.inventory_value,
                    units_sold: acc.units_sold,
                    cogs: acc.cogs,
                    turnover_ratio: ratio,
                    days_sales_of_inventory: days_sales_of_inventory(
                        acc.inventory_value,
                        acc.cogs,
                        period_days,
                    ),
                    health: classify_health(ratio),
                }
            })
            .collect();

        tracing::debug!(
            products = items.len(),
            %total_cogs,
            "Turnover report computed"
        );

        Ok(TurnoverReport {
            summary,
            products: items,
            categories,
        })
    }

    async fn load_costed_products(
        &self,
        category: Option<&str>,
    ) -> AppResult<Vec<CostedProductRow>> {
        let rows = sqlx::query_as::<_, CostedProductRow>(
            r#"
            SELECT p.id as product_id, p.name, p.sku, p.category, p.cost_price,
                   COALESCE(r.stock_level, 0) as stock_level
            FROM products p
            LEFT JOIN inventory_records r ON r.product_id = p.id
            WHERE p.cost_price IS NOT NULL AND p.cost_price > 0
              AND ($1::text IS NULL OR p.category = $1)
            ORDER BY p.name ASC
            "#,
        )
        .bind(category)
        .fetch_all(&self.db)
        .await?;

        Ok(rows)
    }

    async fn load_sales(
        &self,
        period_start: NaiveDate,
        period_end: NaiveDate,
        category: Option<&str>,
    ) -> AppResult<Vec<SalesRow>> {
        let rows = sqlx::query_as::<_, SalesRow>(
            r#"
            SELECT oi.product_id,
                   SUM(oi.quantity)::bigint as units_sold,
                   SUM(oi.quantity * p.cost_price) as cogs
            FROM order_items oi
            JOIN orders o ON o.id = oi.order_id
            JOIN products p ON p.id = oi.product_id
            WHERE o.payment_status = 'paid'
              AND o.order_date BETWEEN $1 AND $2
              AND p.cost_price IS NOT NULL AND p.cost_price > 0
              AND ($3::text IS NULL OR p.category = $3)
            GROUP BY oi.product_id
            "#,
        )
        .bind(period_start)
        .bind(period_end)
        .bind(category)
        .fetch_all(&self.db)
        .await?;

        Ok(rows)
    }
}

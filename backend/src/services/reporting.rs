//! Reporting service for dashboard metrics and data export

use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::PgPool;

use crate::error::AppResult;

/// Reporting service
#[derive(Clone)]
pub struct ReportingService {
    db: PgPool,
}

/// Dashboard metrics
#[derive(Debug, Serialize)]
pub struct DashboardMetrics {
    pub product_count: i64,
    pub total_units_on_hand: i64,
    pub inventory_value_at_cost: Decimal,
    pub low_stock_count: i64,
    pub movements_last_7_days: i64,
}

impl ReportingService {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Headline metrics for the dashboard
    pub async fn dashboard_metrics(&self) -> AppResult<DashboardMetrics> {
        let product_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products")
            .fetch_one(&self.db)
            .await?;

        let total_units_on_hand: i64 = sqlx::query_scalar(
            "SELECT COALESCE(SUM(stock_level), 0)::bigint FROM inventory_records",
        )
        .fetch_one(&self.db)
        .await?;

        let inventory_value_at_cost: Decimal = sqlx::query_scalar(
            r#"
            SELECT COALESCE(SUM(r.stock_level * p.cost_price), 0)
            FROM inventory_records r
            JOIN products p ON p.id = r.product_id
            WHERE p.cost_price IS NOT NULL
            "#,
        )
        .fetch_one(&self.db)
        .await?;

        let low_stock_count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM inventory_records WHERE stock_level <= reorder_level",
        )
        .fetch_one(&self.db)
        .await?;

        let movements_last_7_days: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM stock_movements WHERE created_at > NOW() - INTERVAL '7 days'",
        )
        .fetch_one(&self.db)
        .await?;

        Ok(DashboardMetrics {
            product_count,
            total_units_on_hand,
            inventory_value_at_cost,
            low_stock_count,
            movements_last_7_days,
        })
    }

    /// Export report data to CSV format
    pub fn export_to_csv<T: Serialize>(data: &[T]) -> AppResult<String> {
        let mut wtr = csv::Writer::from_writer(vec![]);
        for record in data {
            wtr.serialize(record).map_err(|e| {
                crate::error::AppError::Internal(format!("CSV serialization error: {}", e))
            })?;
        }
        let csv_data = String::from_utf8(wtr.into_inner().map_err(|e| {
            crate::error::AppError::Internal(format!("CSV writer error: {}", e))
        })?)
        .map_err(|e| crate::error::AppError::Internal(format!("UTF-8 conversion error: {}", e)))?;
        Ok(csv_data)
    }
}

//! HTTP handlers for valuation, turnover and dashboard reports

use axum::{
    extract::{Query, State},
    http::header,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;

use crate::error::AppResult;
use crate::models::ValuationMethod;
use crate::services::reporting::{DashboardMetrics, ReportingService};
use crate::services::turnover::{TurnoverReport, TurnoverService};
use crate::services::valuation::{InventoryValueReport, ValuationFilter, ValuationService};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct ValuationQuery {
    pub method: Option<String>,
    pub category: Option<String>,
    pub warehouse_zone: Option<String>,
    pub format: Option<String>, // "json" or "csv"
}

#[derive(Debug, Deserialize)]
pub struct TurnoverQuery {
    pub period_days: Option<i64>,
    pub category: Option<String>,
    pub format: Option<String>,
}

/// Get dashboard metrics
pub async fn get_dashboard(State(state): State<AppState>) -> AppResult<Json<DashboardMetrics>> {
    let service = ReportingService::new(state.db);
    let metrics = service.dashboard_metrics().await?;
    Ok(Json(metrics))
}

/// Get the inventory valuation report
///
/// An explicit `method` overrides each record's preferred method; when
/// omitted, items are valued by their own preference.
pub async fn get_inventory_value(
    State(state): State<AppState>,
    Query(query): Query<ValuationQuery>,
) -> AppResult<impl IntoResponse> {
    let method = query
        .method
        .as_deref()
        .map(ValuationMethod::parse_or_default);
    let filter = ValuationFilter {
        category: query.category,
        warehouse_zone: query.warehouse_zone,
    };

    let service = ValuationService::new(state.db);
    let report: InventoryValueReport = service.calculate_inventory_value(method, &filter).await?;

    if query.format.as_deref() == Some("csv") {
        let csv = ReportingService::export_to_csv(&report.items)?;
        Ok((
            [
                (header::CONTENT_TYPE, "text/csv"),
                (
                    header::CONTENT_DISPOSITION,
                    "attachment; filename=\"inventory_value.csv\"",
                ),
            ],
            csv,
        )
            .into_response())
    } else {
        Ok(Json(report).into_response())
    }
}

/// Get the inventory turnover report
pub async fn get_turnover(
    State(state): State<AppState>,
    Query(query): Query<TurnoverQuery>,
) -> AppResult<impl IntoResponse> {
    let period_days = query
        .period_days
        .unwrap_or(state.config.reporting.default_period_days);

    let service = TurnoverService::new(state.db);
    let report: TurnoverReport = service
        .calculate_turnover_report(period_days, query.category.as_deref())
        .await?;

    if query.format.as_deref() == Some("csv") {
        let csv = ReportingService::export_to_csv(&report.products)?;
        Ok((
            [
                (header::CONTENT_TYPE, "text/csv"),
                (
                    header::CONTENT_DISPOSITION,
                    "attachment; filename=\"inventory_turnover.csv\"",
                ),
            ],
            csv,
        )
            .into_response())
    } else {
        Ok(Json(report).into_response())
    }
}

//! Service health endpoint
//!
//! Reports overall readiness for StockTrack: the service is healthy only
//! while its Postgres pool can execute a query, since every report and
//! ledger write depends on it.

use axum::{extract::State, Json};
use serde::Serialize;

use crate::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub service: &'static str,
    pub status: &'static str,
    pub version: &'static str,
    pub database: &'static str,
    pub environment: String,
}

/// Overall status from the database probe result
fn overall_status(database_ok: bool) -> &'static str {
    if database_ok {
        "healthy"
    } else {
        "degraded"
    }
}

/// Report service readiness, probing the database pool
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let database_ok = sqlx::query("SELECT 1").execute(&state.db).await.is_ok();

    Json(HealthResponse {
        service: "stocktrack",
        status: overall_status(database_ok),
        version: env!("CARGO_PKG_VERSION"),
        database: if database_ok {
            "connected"
        } else {
            "disconnected"
        },
        environment: state.config.environment.clone(),
    })
}

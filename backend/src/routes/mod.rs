//! Route definitions for the StockTrack API

use axum::{
    routing::{get, post},
    Router,
};

use crate::{handlers, AppState};

/// Create API routes
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Health check
        .route("/health", get(handlers::health_check))
        // Product catalog
        .nest("/products", product_routes())
        // Inventory records, batches and the movement ledger
        .nest("/inventory", inventory_routes())
        // Valuation, turnover and dashboard reports
        .nest("/reports", report_routes())
}

/// Product catalog routes
fn product_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::list_products).post(handlers::create_product),
        )
        .route("/categories", get(handlers::list_categories))
        .route(
            "/:product_id",
            get(handlers::get_product).put(handlers::update_product),
        )
}

/// Inventory management routes
fn inventory_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_records))
        .route("/movements", post(handlers::record_movement).get(handlers::list_movements))
        .route("/batches", post(handlers::receive_batch))
        .route("/low-stock", get(handlers::low_stock))
        .route(
            "/:product_id",
            get(handlers::get_record).put(handlers::update_record),
        )
        .route("/:product_id/adjust", post(handlers::adjust_stock))
        .route("/:product_id/movements", get(handlers::get_movements))
        .route("/:product_id/batches", get(handlers::list_batches))
}

/// Reporting routes
fn report_routes() -> Router<AppState> {
    Router::new()
        .route("/dashboard", get(handlers::get_dashboard))
        .route("/inventory-value", get(handlers::get_inventory_value))
        .route("/turnover", get(handlers::get_turnover))
}

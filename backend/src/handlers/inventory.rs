//! HTTP handlers for inventory and stock movement endpoints

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::error::AppResult;
use crate::models::{InventoryBatch, InventoryRecord, PaginatedResponse, Pagination, StockMovement};
use crate::services::inventory::{
    AdjustStockInput, BatchReceipt, InventoryService, LowStockItem, ReceiveBatchInput,
    RecordMovementInput, UpdateRecordInput,
};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct ListMovementsQuery {
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

/// Record a stock movement
pub async fn record_movement(
    State(state): State<AppState>,
    Json(input): Json<RecordMovementInput>,
) -> AppResult<Json<StockMovement>> {
    let service = InventoryService::new(state.db);
    let movement = service.record_movement(input).await?;
    Ok(Json(movement))
}

/// Manually adjust stock for a product
pub async fn adjust_stock(
    State(state): State<AppState>,
    Path(product_id): Path<Uuid>,
    Json(input): Json<AdjustStockInput>,
) -> AppResult<Json<StockMovement>> {
    let service = InventoryService::new(state.db);
    let movement = service.adjust_stock(product_id, input).await?;
    Ok(Json(movement))
}

/// Receive a batch lot
pub async fn receive_batch(
    State(state): State<AppState>,
    Json(input): Json<ReceiveBatchInput>,
) -> AppResult<Json<BatchReceipt>> {
    let service = InventoryService::new(state.db);
    let receipt = service.receive_batch(input).await?;
    Ok(Json(receipt))
}

/// Get the inventory record for a product
pub async fn get_record(
    State(state): State<AppState>,
    Path(product_id): Path<Uuid>,
) -> AppResult<Json<InventoryRecord>> {
    let service = InventoryService::new(state.db);
    let record = service.get_record(product_id).await?;
    Ok(Json(record))
}

/// List all inventory records
pub async fn list_records(
    State(state): State<AppState>,
) -> AppResult<Json<Vec<InventoryRecord>>> {
    let service = InventoryService::new(state.db);
    let records = service.list_records().await?;
    Ok(Json(records))
}

/// Update inventory record thresholds
pub async fn update_record(
    State(state): State<AppState>,
    Path(product_id): Path<Uuid>,
    Json(input): Json<UpdateRecordInput>,
) -> AppResult<Json<InventoryRecord>> {
    let service = InventoryService::new(state.db);
    let record = service.update_record(product_id, input).await?;
    Ok(Json(record))
}

/// Get the movement ledger for a product
pub async fn get_movements(
    State(state): State<AppState>,
    Path(product_id): Path<Uuid>,
) -> AppResult<Json<Vec<StockMovement>>> {
    let service = InventoryService::new(state.db);
    let movements = service.get_movements(product_id).await?;
    Ok(Json(movements))
}

/// List movements across all products
pub async fn list_movements(
    State(state): State<AppState>,
    Query(query): Query<ListMovementsQuery>,
) -> AppResult<Json<PaginatedResponse<StockMovement>>> {
    let pagination = Pagination {
        page: query.page.unwrap_or(1),
        per_page: query.per_page.unwrap_or(50),
    };
    let service = InventoryService::new(state.db);
    let movements = service.list_movements(&pagination).await?;
    Ok(Json(movements))
}

/// List batch lots for a product
pub async fn list_batches(
    State(state): State<AppState>,
    Path(product_id): Path<Uuid>,
) -> AppResult<Json<Vec<InventoryBatch>>> {
    let service = InventoryService::new(state.db);
    let batches = service.list_batches(product_id).await?;
    Ok(Json(batches))
}

/// Products at or below their reorder level
pub async fn low_stock(State(state): State<AppState>) -> AppResult<Json<Vec<LowStockItem>>> {
    let service = InventoryService::new(state.db);
    let items = service.low_stock().await?;
    Ok(Json(items))
}

//! Inventory service: per-product stock records, batch lots, and the
//! append-only stock movement ledger
//!
//! Every stock change goes through one code path that locks the inventory
//! record, rejects anything that would drive stock below zero, updates the
//! stock level, and appends the ledger entry inside a single database
//! transaction. `new_quantity = previous_quantity + quantity_change` holds
//! for every ledger row and the record always matches the latest entry.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::models::{
    InventoryBatch, InventoryRecord, MovementType, PaginatedResponse, Pagination, PaginationMeta,
    StockMovement, ValuationMethod,
};

/// Inventory service for stock records and the movement ledger
#[derive(Clone)]
pub struct InventoryService {
    db: PgPool,
}

/// Row for inventory record queries
#[derive(Debug, FromRow)]
struct RecordRow {
    id: Uuid,
    product_id: Uuid,
    stock_level: i64,
    reorder_level: i64,
    optimal_level: i64,
    unit_of_measure: String,
    warehouse_zone: Option<String>,
    preferred_valuation_method: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<RecordRow> for InventoryRecord {
    fn from(row: RecordRow) -> Self {
        InventoryRecord {
            id: row.id,
            product_id: row.product_id,
            stock_level: row.stock_level,
            reorder_level: row.reorder_level,
            optimal_level: row.optimal_level,
            unit_of_measure: row.unit_of_measure,
            warehouse_zone: row.warehouse_zone,
            preferred_valuation_method: ValuationMethod::parse_or_default(
                &row.preferred_valuation_method,
            ),
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Row for stock movement queries
#[derive(Debug, FromRow)]
struct MovementRow {
    id: Uuid,
    product_id: Uuid,
    quantity_change: i64,
    previous_quantity: i64,
    new_quantity: i64,
    movement_type: String,
    reference_id: Option<Uuid>,
    reason: Option<String>,
    created_by: Option<String>,
    created_at: DateTime<Utc>,
}

impl TryFrom<MovementRow> for StockMovement {
    type Error = AppError;

    fn try_from(row: MovementRow) -> Result<Self, Self::Error> {
        let movement_type = MovementType::parse(&row.movement_type).ok_or_else(|| {
            AppError::Internal(format!("Unknown movement type: {}", row.movement_type))
        })?;
        Ok(StockMovement {
            id: row.id,
            product_id: row.product_id,
            quantity_change: row.quantity_change,
            previous_quantity: row.previous_quantity,
            new_quantity: row.new_quantity,
            movement_type,
            reference_id: row.reference_id,
            reason: row.reason,
            created_by: row.created_by,
            created_at: row.created_at,
        })
    }
}

/// Row for batch queries
#[derive(Debug, FromRow)]
struct BatchRow {
    id: Uuid,
    product_id: Uuid,
    quantity: i64,
    cost_per_unit: Decimal,
    received_date: NaiveDate,
    expiry_date: Option<NaiveDate>,
    reference_id: Option<Uuid>,
    created_at: DateTime<Utc>,
}

impl From<BatchRow> for InventoryBatch {
    fn from(row: BatchRow) -> Self {
        InventoryBatch {
            id: row.id,
            product_id: row.product_id,
            quantity: row.quantity,
            cost_per_unit: row.cost_per_unit,
            received_date: row.received_date,
            expiry_date: row.expiry_date,
            reference_id: row.reference_id,
            created_at: row.created_at,
        }
    }
}

/// Input for recording a stock movement
#[derive(Debug, Deserialize)]
pub struct RecordMovementInput {
    pub product_id: Uuid,
    pub movement_type: MovementType,
    pub quantity_change: i64,
    pub reference_id: Option<Uuid>,
    pub reason: Option<String>,
    pub created_by: Option<String>,
}

/// Input for a manual stock adjustment
#[derive(Debug, Deserialize)]
pub struct AdjustStockInput {
    pub quantity_change: i64,
    pub reason: String,
    pub created_by: Option<String>,
}

/// Input for receiving a batch lot
#[derive(Debug, Deserialize)]
pub struct ReceiveBatchInput {
    pub product_id: Uuid,
    pub quantity: i64,
    pub cost_per_unit: Decimal,
    pub received_date: Option<NaiveDate>,
    pub expiry_date: Option<NaiveDate>,
    pub reference_id: Option<Uuid>,
    /// Partial delivery against a purchase order
    pub partial: Option<bool>,
    pub created_by: Option<String>,
}

/// Result of receiving a batch: the lot and its ledger entry
#[derive(Debug, Serialize)]
pub struct BatchReceipt {
    pub batch: InventoryBatch,
    pub movement: StockMovement,
}

/// Input for updating inventory record thresholds
#[derive(Debug, Deserialize)]
pub struct UpdateRecordInput {
    pub reorder_level: Option<i64>,
    pub optimal_level: Option<i64>,
    pub unit_of_measure: Option<String>,
    pub warehouse_zone: Option<String>,
    pub preferred_valuation_method: Option<ValuationMethod>,
}

/// A product at or below its reorder level
#[derive(Debug, Serialize, FromRow)]
pub struct LowStockItem {
    pub product_id: Uuid,
    pub name: String,
    pub sku: String,
    pub stock_level: i64,
    pub reorder_level: i64,
    pub optimal_level: i64,
    pub shortfall: i64,
}

impl InventoryService {
    /// Create a new InventoryService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Record a stock movement
    ///
    /// Creates the inventory record on the product's first stock event.
    /// Rejects movements that would drive the stock level below zero.
    pub async fn record_movement(&self, input: RecordMovementInput) -> AppResult<StockMovement> {
        shared::validate_movement_delta(input.quantity_change).map_err(|msg| {
            AppError::Validation {
                field: "quantity_change".to_string(),
                message: msg.to_string(),
            }
        })?;

        self.ensure_product_exists(input.product_id).await?;

        let mut tx = self.db.begin().await?;
        let movement = Self::apply_movement(&mut tx, &input).await?;
        tx.commit().await?;

        Ok(movement)
    }

    /// Manually adjust stock for a product
    pub async fn adjust_stock(
        &self,
        product_id: Uuid,
        input: AdjustStockInput,
    ) -> AppResult<StockMovement> {
        if input.reason.trim().is_empty() {
            return Err(AppError::Validation {
                field: "reason".to_string(),
                message: "Adjustments require a reason".to_string(),
            });
        }

        self.record_movement(RecordMovementInput {
            product_id,
            movement_type: MovementType::Adjustment,
            quantity_change: input.quantity_change,
            reference_id: None,
            reason: Some(input.reason),
            created_by: input.created_by,
        })
        .await
    }

    /// Receive a batch lot and record the matching ledger entry atomically
    pub async fn receive_batch(&self, input: ReceiveBatchInput) -> AppResult<BatchReceipt> {
        shared::validate_quantity_positive(input.quantity).map_err(|msg| {
            AppError::Validation {
                field: "quantity".to_string(),
                message: msg.to_string(),
            }
        })?;
        shared::validate_price(input.cost_per_unit).map_err(|msg| AppError::Validation {
            field: "cost_per_unit".to_string(),
            message: msg.to_string(),
        })?;

        self.ensure_product_exists(input.product_id).await?;

        let received_date = input
            .received_date
            .unwrap_or_else(|| Utc::now().date_naive());
        let movement_type = if input.partial.unwrap_or(false) {
            MovementType::PurchaseOrderPartial
        } else {
            MovementType::PurchaseOrderReceive
        };

        let mut tx = self.db.begin().await?;

        let batch_row = sqlx::query_as::<_, BatchRow>(
            r#"
            INSERT INTO inventory_batches (product_id, quantity, cost_per_unit, received_date,
                                           expiry_date, reference_id)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, product_id, quantity, cost_per_unit, received_date, expiry_date,
                      reference_id, created_at
            "#,
        )
        .bind(input.product_id)
        .bind(input.quantity)
        .bind(input.cost_per_unit)
        .bind(received_date)
        .bind(input.expiry_date)
        .bind(input.reference_id)
        .fetch_one(&mut *tx)
        .await?;

        let movement = Self::apply_movement(
            &mut tx,
            &RecordMovementInput {
                product_id: input.product_id,
                movement_type,
                quantity_change: input.quantity,
                reference_id: input.reference_id,
                reason: Some("Batch received".to_string()),
                created_by: input.created_by,
            },
        )
        .await?;

        tx.commit().await?;

        Ok(BatchReceipt {
            batch: batch_row.into(),
            movement,
        })
    }

    /// Get the inventory record for a product
    pub async fn get_record(&self, product_id: Uuid) -> AppResult<InventoryRecord> {
        let row = sqlx::query_as::<_, RecordRow>(
            r#"
            SELECT id, product_id, stock_level, reorder_level, optimal_level, unit_of_measure,
                   warehouse_zone, preferred_valuation_method, created_at, updated_at
            FROM inventory_records
            WHERE product_id = $1
            "#,
        )
        .bind(product_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Inventory record".to_string()))?;

        Ok(row.into())
    }

    /// List all inventory records
    pub async fn list_records(&self) -> AppResult<Vec<InventoryRecord>> {
        let rows = sqlx::query_as::<_, RecordRow>(
            r#"
            SELECT id, product_id, stock_level, reorder_level, optimal_level, unit_of_measure,
                   warehouse_zone, preferred_valuation_method, created_at, updated_at
            FROM inventory_records
            ORDER BY updated_at DESC
            "#,
        )
        .fetch_all(&self.db)
        .await?;

        Ok(rows.into_iter().map(InventoryRecord::from).collect())
    }

    /// Update inventory record thresholds and reference data
    pub async fn update_record(
        &self,
        product_id: Uuid,
        input: UpdateRecordInput,
    ) -> AppResult<InventoryRecord> {
        let existing = self.get_record(product_id).await?;

        let reorder_level = input.reorder_level.unwrap_or(existing.reorder_level);
        let optimal_level = input.optimal_level.unwrap_or(existing.optimal_level);
        let unit_of_measure = input.unit_of_measure.unwrap_or(existing.unit_of_measure);
        let warehouse_zone = input.warehouse_zone.or(existing.warehouse_zone);
        let preferred = input
            .preferred_valuation_method
            .unwrap_or(existing.preferred_valuation_method);

        if reorder_level < 0 || optimal_level < 0 {
            return Err(AppError::Validation {
                field: "reorder_level/optimal_level".to_string(),
                message: "Stock thresholds cannot be negative".to_string(),
            });
        }

        let row = sqlx::query_as::<_, RecordRow>(
            r#"
            UPDATE inventory_records
            SET reorder_level = $1, optimal_level = $2, unit_of_measure = $3,
                warehouse_zone = $4, preferred_valuation_method = $5, updated_at = NOW()
            WHERE product_id = $6
            RETURNING id, product_id, stock_level, reorder_level, optimal_level, unit_of_measure,
                      warehouse_zone, preferred_valuation_method, created_at, updated_at
            "#,
        )
        .bind(reorder_level)
        .bind(optimal_level)
        .bind(&unit_of_measure)
        .bind(&warehouse_zone)
        .bind(preferred.as_str())
        .bind(product_id)
        .fetch_one(&self.db)
        .await?;

        Ok(row.into())
    }

    /// Get the movement ledger for a product, newest first
    pub async fn get_movements(&self, product_id: Uuid) -> AppResult<Vec<StockMovement>> {
        self.ensure_product_exists(product_id).await?;

        let rows = sqlx::query_as::<_, MovementRow>(
            r#"
            SELECT id, product_id, quantity_change, previous_quantity, new_quantity,
                   movement_type, reference_id, reason, created_by, created_at
            FROM stock_movements
            WHERE product_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(product_id)
        .fetch_all(&self.db)
        .await?;

        rows.into_iter().map(StockMovement::try_from).collect()
    }

    /// List movements across all products, newest first
    pub async fn list_movements(
        &self,
        pagination: &Pagination,
    ) -> AppResult<PaginatedResponse<StockMovement>> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM stock_movements")
            .fetch_one(&self.db)
            .await?;

        let rows = sqlx::query_as::<_, MovementRow>(
            r#"
            SELECT id, product_id, quantity_change, previous_quantity, new_quantity,
                   movement_type, reference_id, reason, created_by, created_at
            FROM stock_movements
            ORDER BY created_at DESC
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(pagination.limit())
        .bind(pagination.offset())
        .fetch_all(&self.db)
        .await?;

        let data = rows
            .into_iter()
            .map(StockMovement::try_from)
            .collect::<AppResult<Vec<_>>>()?;

        Ok(PaginatedResponse {
            data,
            pagination: PaginationMeta::new(pagination, total as u64),
        })
    }

    /// List batch lots for a product, oldest receipt first
    pub async fn list_batches(&self, product_id: Uuid) -> AppResult<Vec<InventoryBatch>> {
        self.ensure_product_exists(product_id).await?;

        let rows = sqlx::query_as::<_, BatchRow>(
            r#"
            SELECT id, product_id, quantity, cost_per_unit, received_date, expiry_date,
                   reference_id, created_at
            FROM inventory_batches
            WHERE product_id = $1
            ORDER BY received_date ASC, created_at ASC
            "#,
        )
        .bind(product_id)
        .fetch_all(&self.db)
        .await?;

        Ok(rows.into_iter().map(InventoryBatch::from).collect())
    }

    /// Products at or below their reorder level, most urgent first
    pub async fn low_stock(&self) -> AppResult<Vec<LowStockItem>> {
        let items = sqlx::query_as::<_, LowStockItem>(
            r#"
            SELECT p.id as product_id, p.name, p.sku,
                   r.stock_level, r.reorder_level, r.optimal_level,
                   r.reorder_level - r.stock_level as shortfall
            FROM inventory_records r
            JOIN products p ON p.id = r.product_id
            WHERE r.stock_level <= r.reorder_level
            ORDER BY shortfall DESC, p.name ASC
            "#,
        )
        .fetch_all(&self.db)
        .await?;

        Ok(items)
    }

    async fn ensure_product_exists(&self, product_id: Uuid) -> AppResult<()> {
        let exists =
            sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM products WHERE id = $1)")
                .bind(product_id)
                .fetch_one(&self.db)
                .await?;

        if !exists {
            return Err(AppError::NotFound("Product".to_string()));
        }
        Ok(())
    }

    /// Apply a movement inside an open transaction: lock the record, check
    /// the non-negative stock invariant, update the level, append the entry.
    async fn apply_movement(
        tx: &mut Transaction<'_, Postgres>,
        input: &RecordMovementInput,
    ) -> AppResult<StockMovement> {
        // First stock event for a product creates its record
        sqlx::query(
            r#"
            INSERT INTO inventory_records (product_id)
            VALUES ($1)
            ON CONFLICT (product_id) DO NOTHING
            "#,
        )
        .bind(input.product_id)
        .execute(&mut **tx)
        .await?;

        let previous_quantity = sqlx::query_scalar::<_, i64>(
            "SELECT stock_level FROM inventory_records WHERE product_id = $1 FOR UPDATE",
        )
        .bind(input.product_id)
        .fetch_one(&mut **tx)
        .await?;

        let new_quantity = previous_quantity + input.quantity_change;
        if new_quantity < 0 {
            return Err(AppError::InsufficientInventory(format!(
                "Stock level {} cannot absorb a change of {}",
                previous_quantity, input.quantity_change
            )));
        }

        sqlx::query(
            "UPDATE inventory_records SET stock_level = $1, updated_at = NOW() WHERE product_id = $2",
        )
        .bind(new_quantity)
        .bind(input.product_id)
        .execute(&mut **tx)
        .await?;

        let row = sqlx::query_as::<_, MovementRow>(
            r#"
            INSERT INTO stock_movements (product_id, quantity_change, previous_quantity,
                                         new_quantity, movement_type, reference_id, reason,
                                         created_by)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING id, product_id, quantity_change, previous_quantity, new_quantity,
                      movement_type, reference_id, reason, created_by, created_at
            "#,
        )
        .bind(input.product_id)
        .bind(input.quantity_change)
        .bind(previous_quantity)
        .bind(new_quantity)
        .bind(input.movement_type.as_str())
        .bind(input.reference_id)
        .bind(&input.reason)
        .bind(&input.created_by)
        .fetch_one(&mut **tx)
        .await?;

        row.try_into()
    }
}

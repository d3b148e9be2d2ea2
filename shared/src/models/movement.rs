//! Stock movement ledger models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An immutable stock movement ledger entry
///
/// Invariant: `new_quantity = previous_quantity + quantity_change` for every
/// entry, and the inventory record's stock level equals the `new_quantity`
/// of the product's most recent entry. Both are guaranteed because the stock
/// update and the ledger append happen in one database transaction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StockMovement {
    pub id: Uuid,
    pub product_id: Uuid,
    pub quantity_change: i64,
    pub previous_quantity: i64,
    pub new_quantity: i64,
    pub movement_type: MovementType,
    /// Order or purchase-order id that caused the movement
    pub reference_id: Option<Uuid>,
    pub reason: Option<String>,
    pub created_by: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Types of stock movements
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MovementType {
    Purchase,
    Sale,
    Adjustment,
    StockCount,
    Return,
    Initial,
    PurchaseOrderReceive,
    PurchaseOrderPartial,
}

impl MovementType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MovementType::Purchase => "purchase",
            MovementType::Sale => "sale",
            MovementType::Adjustment => "adjustment",
            MovementType::StockCount => "stock_count",
            MovementType::Return => "return",
            MovementType::Initial => "initial",
            MovementType::PurchaseOrderReceive => "purchase_order_receive",
            MovementType::PurchaseOrderPartial => "purchase_order_partial",
        }
    }

    /// Parse a stored movement type name
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "purchase" => Some(MovementType::Purchase),
            "sale" => Some(MovementType::Sale),
            "adjustment" => Some(MovementType::Adjustment),
            "stock_count" => Some(MovementType::StockCount),
            "return" => Some(MovementType::Return),
            "initial" => Some(MovementType::Initial),
            "purchase_order_receive" => Some(MovementType::PurchaseOrderReceive),
            "purchase_order_partial" => Some(MovementType::PurchaseOrderPartial),
            _ => None,
        }
    }
}

impl std::fmt::Display for MovementType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

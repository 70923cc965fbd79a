//! Purchase composition models.

use inventory_core::composition::{CompositionEdge, EdgeDetail};
use inventory_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `purchase_compositions` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct PurchaseComposition {
    pub id: DbId,
    pub parent_purchase_id: DbId,
    pub child_purchase_id: DbId,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl From<PurchaseComposition> for CompositionEdge {
    fn from(row: PurchaseComposition) -> Self {
        CompositionEdge {
            id: row.id,
            parent_purchase_id: row.parent_purchase_id,
            child_purchase_id: row.child_purchase_id,
            created_at: row.created_at,
        }
    }
}

/// A composition joined with both purchases' display data.
#[derive(Debug, Clone, FromRow)]
pub struct EdgeDetailRow {
    pub id: DbId,
    pub parent_purchase_id: DbId,
    pub child_purchase_id: DbId,
    pub parent_serial_number: Option<String>,
    pub child_serial_number: Option<String>,
    pub parent_product_name: String,
    pub child_product_name: String,
    pub parent_owner_name: Option<String>,
    pub child_owner_name: Option<String>,
    pub created_at: Timestamp,
}

impl From<EdgeDetailRow> for EdgeDetail {
    fn from(row: EdgeDetailRow) -> Self {
        EdgeDetail {
            id: row.id,
            parent_purchase_id: row.parent_purchase_id,
            child_purchase_id: row.child_purchase_id,
            parent_serial_number: row.parent_serial_number,
            child_serial_number: row.child_serial_number,
            parent_product_name: row.parent_product_name,
            child_product_name: row.child_product_name,
            parent_owner_name: row.parent_owner_name,
            child_owner_name: row.child_owner_name,
            created_at: row.created_at,
        }
    }
}

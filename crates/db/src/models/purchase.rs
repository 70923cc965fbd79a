//! Purchase ledger models.

use chrono::NaiveDate;
use inventory_core::composition::{PurchaseFacts, PurchasePair, PurchaseSummary};
use inventory_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

// ---------------------------------------------------------------------------
// Entity structs (database rows)
// ---------------------------------------------------------------------------

/// A row from the `purchases` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Purchase {
    pub id: DbId,
    pub product_id: DbId,
    pub supplier_id: Option<DbId>,
    pub owner_user_id: Option<DbId>,
    pub serial_number: Option<String>,
    pub purchase_date: NaiveDate,
    pub warranty_end: Option<NaiveDate>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A purchase joined with its product and owner.
#[derive(Debug, Clone, FromRow)]
pub struct PurchaseSummaryRow {
    pub id: DbId,
    pub product_id: DbId,
    pub product_name: String,
    pub is_parent_type: bool,
    pub owner_user_id: Option<DbId>,
    pub owner_name: Option<String>,
    pub serial_number: Option<String>,
    pub purchase_date: NaiveDate,
}

impl From<PurchaseSummaryRow> for PurchaseSummary {
    fn from(row: PurchaseSummaryRow) -> Self {
        PurchaseSummary {
            id: row.id,
            product_id: row.product_id,
            product_name: row.product_name,
            is_parent_type: row.is_parent_type,
            owner_user_id: row.owner_user_id,
            owner_name: row.owner_name,
            serial_number: row.serial_number,
            purchase_date: row.purchase_date,
        }
    }
}

/// Both sides of a proposed composition, read with one query.
#[derive(Debug, Clone, FromRow)]
pub struct PurchasePairRow {
    pub parent_id: DbId,
    pub parent_product_id: DbId,
    pub parent_owner_user_id: Option<DbId>,
    pub parent_is_parent_type: bool,
    pub child_id: DbId,
    pub child_product_id: DbId,
    pub child_owner_user_id: Option<DbId>,
    pub child_is_parent_type: bool,
}

impl From<PurchasePairRow> for PurchasePair {
    fn from(row: PurchasePairRow) -> Self {
        PurchasePair {
            parent: PurchaseFacts {
                id: row.parent_id,
                product_id: row.parent_product_id,
                owner_user_id: row.parent_owner_user_id,
                is_parent_type: row.parent_is_parent_type,
            },
            child: PurchaseFacts {
                id: row.child_id,
                product_id: row.child_product_id,
                owner_user_id: row.child_owner_user_id,
                is_parent_type: row.child_is_parent_type,
            },
        }
    }
}

// ---------------------------------------------------------------------------
// DTOs (request payloads)
// ---------------------------------------------------------------------------

/// DTO for recording a purchase.
#[derive(Debug, Clone, Deserialize)]
pub struct CreatePurchase {
    pub product_id: DbId,
    pub supplier_id: Option<DbId>,
    pub owner_user_id: Option<DbId>,
    pub serial_number: Option<String>,
    pub purchase_date: NaiveDate,
    pub warranty_end: Option<NaiveDate>,
}

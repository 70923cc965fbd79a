//! Value types exchanged between the composition engine and its stores.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::types::{DbId, Timestamp};

/// The subset of a purchase (joined with its product) the rules look at.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PurchaseFacts {
    pub id: DbId,
    pub product_id: DbId,
    pub owner_user_id: Option<DbId>,
    /// Copied from the purchase's product.
    pub is_parent_type: bool,
}

/// Both sides of a proposed edge, read in one lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PurchasePair {
    pub parent: PurchaseFacts,
    pub child: PurchaseFacts,
}

/// A directed parent -> child link between two purchases.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompositionEdge {
    pub id: DbId,
    pub parent_purchase_id: DbId,
    pub child_purchase_id: DbId,
    pub created_at: Timestamp,
}

/// A purchase as shown in listings and selection forms.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PurchaseSummary {
    pub id: DbId,
    pub product_id: DbId,
    pub product_name: String,
    pub is_parent_type: bool,
    pub owner_user_id: Option<DbId>,
    pub owner_name: Option<String>,
    pub serial_number: Option<String>,
    pub purchase_date: NaiveDate,
}

/// An edge joined with display data for both of its purchases.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgeDetail {
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

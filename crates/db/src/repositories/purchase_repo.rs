//! Repository for the purchase ledger.
//!
//! Besides plain CRUD this provides the joined reads the composition engine
//! needs: the locked pair lookup used while validating a proposal, and the
//! summary listings behind the eligibility queries.

use inventory_core::types::DbId;
use sqlx::{PgConnection, PgPool};

use crate::models::purchase::{CreatePurchase, Purchase, PurchasePairRow, PurchaseSummaryRow};

/// Column list for `purchases` queries.
const COLUMNS: &str = "\
    id, product_id, supplier_id, owner_user_id, serial_number, \
    purchase_date, warranty_end, created_at, updated_at";

/// Select list and joins producing [`PurchaseSummaryRow`] for alias `p`.
pub(crate) const SUMMARY_SELECT: &str = "\
    SELECT p.id, p.product_id, pr.name AS product_name, pr.is_parent_type, \
           p.owner_user_id, u.name AS owner_name, p.serial_number, p.purchase_date \
    FROM purchases p \
    JOIN products pr ON pr.id = p.product_id \
    LEFT JOIN users u ON u.id = p.owner_user_id";

/// Provides CRUD operations and composition reads for purchases.
pub struct PurchaseRepo;

impl PurchaseRepo {
    pub async fn create(pool: &PgPool, input: &CreatePurchase) -> Result<Purchase, sqlx::Error> {
        let query = format!(
            "INSERT INTO purchases (\
                product_id, supplier_id, owner_user_id, serial_number, \
                purchase_date, warranty_end\
             ) VALUES ($1, $2, $3, $4, $5, $6) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Purchase>(&query)
            .bind(input.product_id)
            .bind(input.supplier_id)
            .bind(input.owner_user_id)
            .bind(input.serial_number.as_deref())
            .bind(input.purchase_date)
            .bind(input.warranty_end)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Purchase>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM purchases WHERE id = $1");
        sqlx::query_as::<_, Purchase>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Delete a purchase. Its compositions go with it (`ON DELETE CASCADE`).
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM purchases WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Read both purchases of a proposed composition with their product
    /// classification, locking the purchase and product rows `FOR SHARE`
    /// until the surrounding transaction ends.
    ///
    /// Returns `None` unless both purchases exist.
    pub async fn lock_pair(
        conn: &mut PgConnection,
        parent_id: DbId,
        child_id: DbId,
    ) -> Result<Option<PurchasePairRow>, sqlx::Error> {
        sqlx::query_as::<_, PurchasePairRow>(
            "SELECT \
                pp.id AS parent_id, pp.product_id AS parent_product_id, \
                pp.owner_user_id AS parent_owner_user_id, \
                ppr.is_parent_type AS parent_is_parent_type, \
                cp.id AS child_id, cp.product_id AS child_product_id, \
                cp.owner_user_id AS child_owner_user_id, \
                cpr.is_parent_type AS child_is_parent_type \
             FROM purchases pp \
             JOIN products ppr ON ppr.id = pp.product_id \
             JOIN purchases cp ON cp.id = $2 \
             JOIN products cpr ON cpr.id = cp.product_id \
             WHERE pp.id = $1 \
             FOR SHARE OF pp, ppr, cp, cpr",
        )
        .bind(parent_id)
        .bind(child_id)
        .fetch_optional(conn)
        .await
    }

    /// Purchases owned by `user_id` whose product classification matches.
    pub async fn list_owned_by(
        pool: &PgPool,
        user_id: DbId,
        is_parent_type: bool,
    ) -> Result<Vec<PurchaseSummaryRow>, sqlx::Error> {
        let query = format!(
            "{SUMMARY_SELECT} \
             WHERE p.owner_user_id = $1 AND pr.is_parent_type = $2 \
             ORDER BY p.id"
        );
        sqlx::query_as::<_, PurchaseSummaryRow>(&query)
            .bind(user_id)
            .bind(is_parent_type)
            .fetch_all(pool)
            .await
    }

    /// Every purchase that has an owner, newest purchase date first.
    pub async fn list_owned(pool: &PgPool) -> Result<Vec<PurchaseSummaryRow>, sqlx::Error> {
        let query = format!(
            "{SUMMARY_SELECT} \
             WHERE p.owner_user_id IS NOT NULL \
             ORDER BY p.purchase_date DESC, p.id DESC"
        );
        sqlx::query_as::<_, PurchaseSummaryRow>(&query)
            .fetch_all(pool)
            .await
    }
}

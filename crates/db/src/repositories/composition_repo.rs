//! Repository for the `purchase_compositions` table.
//!
//! Structural invariants live in the schema: `ck_purchase_compositions_no_self_link`
//! and `uq_purchase_compositions_pair`. [`CompositionRepo::insert`] relies on
//! the unique constraint through `ON CONFLICT DO NOTHING`, so a duplicate is
//! detected atomically with the insert.

use futures::stream::BoxStream;
use inventory_core::types::DbId;
use sqlx::{PgConnection, PgPool};

use super::purchase_repo::SUMMARY_SELECT;
use crate::models::composition::{EdgeDetailRow, PurchaseComposition};
use crate::models::purchase::PurchaseSummaryRow;

/// Column list for `purchase_compositions` queries.
const COLUMNS: &str = "id, parent_purchase_id, child_purchase_id, created_at, updated_at";

/// Static so the streaming listing can borrow it for the stream's lifetime.
const LIST_ALL_QUERY: &str = "\
    SELECT id, parent_purchase_id, child_purchase_id, created_at, updated_at \
    FROM purchase_compositions \
    ORDER BY id";

/// Provides CRUD operations for purchase compositions.
pub struct CompositionRepo;

impl CompositionRepo {
    /// Insert a composition. Returns `None` if the ordered pair already exists.
    pub async fn insert(
        conn: &mut PgConnection,
        parent_id: DbId,
        child_id: DbId,
    ) -> Result<Option<PurchaseComposition>, sqlx::Error> {
        let query = format!(
            "INSERT INTO purchase_compositions (parent_purchase_id, child_purchase_id) \
             VALUES ($1, $2) \
             ON CONFLICT ON CONSTRAINT uq_purchase_compositions_pair DO NOTHING \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, PurchaseComposition>(&query)
            .bind(parent_id)
            .bind(child_id)
            .fetch_optional(conn)
            .await
    }

    /// Whether the ordered pair is linked.
    pub async fn exists(
        conn: &mut PgConnection,
        parent_id: DbId,
        child_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let (exists,): (bool,) = sqlx::query_as(
            "SELECT EXISTS(\
                SELECT 1 FROM purchase_compositions \
                WHERE parent_purchase_id = $1 AND child_purchase_id = $2\
             )",
        )
        .bind(parent_id)
        .bind(child_id)
        .fetch_one(conn)
        .await?;
        Ok(exists)
    }

    pub async fn find_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<PurchaseComposition>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM purchase_compositions WHERE id = $1");
        sqlx::query_as::<_, PurchaseComposition>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Delete a composition by ID. Returns true if a row was deleted.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM purchase_compositions WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Stream every composition in insertion order.
    pub fn stream_all(
        pool: &PgPool,
    ) -> BoxStream<'_, Result<PurchaseComposition, sqlx::Error>> {
        sqlx::query_as::<_, PurchaseComposition>(LIST_ALL_QUERY).fetch(pool)
    }

    /// Every composition joined with both purchases' serial, product and owner.
    pub async fn list_details(pool: &PgPool) -> Result<Vec<EdgeDetailRow>, sqlx::Error> {
        sqlx::query_as::<_, EdgeDetailRow>(
            "SELECT \
                pc.id, pc.parent_purchase_id, pc.child_purchase_id, \
                pp.serial_number AS parent_serial_number, \
                cp.serial_number AS child_serial_number, \
                ppr.name AS parent_product_name, \
                cpr.name AS child_product_name, \
                pu.name AS parent_owner_name, \
                cu.name AS child_owner_name, \
                pc.created_at \
             FROM purchase_compositions pc \
             JOIN purchases pp ON pp.id = pc.parent_purchase_id \
             JOIN purchases cp ON cp.id = pc.child_purchase_id \
             JOIN products ppr ON ppr.id = pp.product_id \
             JOIN products cpr ON cpr.id = cp.product_id \
             LEFT JOIN users pu ON pu.id = pp.owner_user_id \
             LEFT JOIN users cu ON cu.id = cp.owner_user_id \
             ORDER BY pc.id",
        )
        .fetch_all(pool)
        .await
    }

    /// Component purchases linked under `parent_id`, in link order.
    pub async fn list_children(
        pool: &PgPool,
        parent_id: DbId,
    ) -> Result<Vec<PurchaseSummaryRow>, sqlx::Error> {
        let query = format!(
            "{SUMMARY_SELECT} \
             JOIN purchase_compositions pc ON pc.child_purchase_id = p.id \
             WHERE pc.parent_purchase_id = $1 \
             ORDER BY pc.id"
        );
        sqlx::query_as::<_, PurchaseSummaryRow>(&query)
            .bind(parent_id)
            .fetch_all(pool)
            .await
    }

    /// Parent purchases `child_id` is linked under, in link order.
    pub async fn list_parents(
        pool: &PgPool,
        child_id: DbId,
    ) -> Result<Vec<PurchaseSummaryRow>, sqlx::Error> {
        let query = format!(
            "{SUMMARY_SELECT} \
             JOIN purchase_compositions pc ON pc.parent_purchase_id = p.id \
             WHERE pc.child_purchase_id = $1 \
             ORDER BY pc.id"
        );
        sqlx::query_as::<_, PurchaseSummaryRow>(&query)
            .bind(child_id)
            .fetch_all(pool)
            .await
    }
}

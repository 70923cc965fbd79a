use sqlx::PgPool;

use crate::models::supplier::{CreateSupplier, Supplier};

/// Provides CRUD operations for suppliers.
pub struct SupplierRepo;

impl SupplierRepo {
    pub async fn create(pool: &PgPool, input: &CreateSupplier) -> Result<Supplier, sqlx::Error> {
        sqlx::query_as::<_, Supplier>(
            "INSERT INTO suppliers (name) VALUES ($1) \
             RETURNING id, name, created_at, updated_at",
        )
        .bind(&input.name)
        .fetch_one(pool)
        .await
    }
}

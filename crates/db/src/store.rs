//! PostgreSQL implementation of the composition storage traits.
//!
//! Every [`PgCompositionUnit`] is one transaction. Purchase rows are read
//! `FOR SHARE` so their owner and product cannot change while a proposal is
//! being decided, and duplicate pairs are caught by the unique constraint at
//! insert time. Dropping a unit without committing rolls the transaction back.

use futures::stream::{BoxStream, StreamExt};
use inventory_core::composition::store::EdgeInsert;
use inventory_core::composition::{
    CompositionEdge, CompositionStore, CompositionUnit, EdgeDetail, Invariant, PurchasePair,
    PurchaseSummary, StorageUnavailable,
};
use inventory_core::types::DbId;
use sqlx::{PgPool, Postgres, Transaction};

use crate::repositories::{CompositionRepo, PurchaseRepo};

/// Log a database failure and convert it into the engine's storage fault.
///
/// The sqlx error is only logged here; callers see a generic message.
fn unavailable(err: sqlx::Error) -> StorageUnavailable {
    tracing::error!(error = %err, "Composition storage error");
    StorageUnavailable::new(err)
}

fn summaries(rows: Vec<crate::models::purchase::PurchaseSummaryRow>) -> Vec<PurchaseSummary> {
    rows.into_iter().map(PurchaseSummary::from).collect()
}

/// Composition store backed by a connection pool.
#[derive(Debug, Clone)]
pub struct PgCompositionStore {
    pool: PgPool,
}

impl PgCompositionStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// One transaction against the composition tables.
pub struct PgCompositionUnit {
    tx: Transaction<'static, Postgres>,
}

impl CompositionUnit for PgCompositionUnit {
    async fn load_pair(
        &mut self,
        parent_id: DbId,
        child_id: DbId,
    ) -> Result<Option<PurchasePair>, StorageUnavailable> {
        let row = PurchaseRepo::lock_pair(&mut self.tx, parent_id, child_id)
            .await
            .map_err(unavailable)?;
        Ok(row.map(PurchasePair::from))
    }

    async fn edge_exists(
        &mut self,
        parent_id: DbId,
        child_id: DbId,
    ) -> Result<bool, StorageUnavailable> {
        CompositionRepo::exists(&mut self.tx, parent_id, child_id)
            .await
            .map_err(unavailable)
    }

    async fn insert_edge(
        &mut self,
        parent_id: DbId,
        child_id: DbId,
    ) -> Result<EdgeInsert, StorageUnavailable> {
        if parent_id == child_id {
            return Ok(EdgeInsert::Violated(Invariant::SelfLink));
        }
        let inserted = CompositionRepo::insert(&mut self.tx, parent_id, child_id)
            .await
            .map_err(unavailable)?;
        Ok(match inserted {
            Some(row) => EdgeInsert::Inserted(row.into()),
            None => EdgeInsert::Violated(Invariant::DuplicatePair),
        })
    }

    async fn commit(self) -> Result<(), StorageUnavailable> {
        self.tx.commit().await.map_err(unavailable)
    }
}

impl CompositionStore for PgCompositionStore {
    type Unit = PgCompositionUnit;

    async fn begin(&self) -> Result<PgCompositionUnit, StorageUnavailable> {
        let tx = self.pool.begin().await.map_err(unavailable)?;
        Ok(PgCompositionUnit { tx })
    }

    async fn remove_edge(&self, edge_id: DbId) -> Result<bool, StorageUnavailable> {
        CompositionRepo::delete(&self.pool, edge_id)
            .await
            .map_err(unavailable)
    }

    fn list_edges(&self) -> BoxStream<'_, Result<CompositionEdge, StorageUnavailable>> {
        CompositionRepo::stream_all(&self.pool)
            .map(|row| row.map(CompositionEdge::from).map_err(unavailable))
            .boxed()
    }

    async fn edge_details(&self) -> Result<Vec<EdgeDetail>, StorageUnavailable> {
        let rows = CompositionRepo::list_details(&self.pool)
            .await
            .map_err(unavailable)?;
        Ok(rows.into_iter().map(EdgeDetail::from).collect())
    }

    async fn children_of(
        &self,
        parent_id: DbId,
    ) -> Result<Vec<PurchaseSummary>, StorageUnavailable> {
        CompositionRepo::list_children(&self.pool, parent_id)
            .await
            .map(summaries)
            .map_err(unavailable)
    }

    async fn parents_of(&self, child_id: DbId) -> Result<Vec<PurchaseSummary>, StorageUnavailable> {
        CompositionRepo::list_parents(&self.pool, child_id)
            .await
            .map(summaries)
            .map_err(unavailable)
    }

    async fn purchases_owned_by(
        &self,
        user_id: DbId,
        is_parent_type: bool,
    ) -> Result<Vec<PurchaseSummary>, StorageUnavailable> {
        PurchaseRepo::list_owned_by(&self.pool, user_id, is_parent_type)
            .await
            .map(summaries)
            .map_err(unavailable)
    }

    async fn owned_purchases(&self) -> Result<Vec<PurchaseSummary>, StorageUnavailable> {
        PurchaseRepo::list_owned(&self.pool)
            .await
            .map(summaries)
            .map_err(unavailable)
    }
}

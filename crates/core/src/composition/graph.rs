//! Edge CRUD on top of a [`CompositionStore`].
//!
//! Unlike the validator, the graph performs no business-rule checks. It only
//! relies on the store's structural invariants (no self-link, no duplicate
//! ordered pair), so it stays safe when used on its own.

use futures::stream::BoxStream;

use super::model::CompositionEdge;
use super::store::{
    CompositionStore, CompositionUnit, EdgeInsert, GraphError, StorageUnavailable,
};
use crate::types::DbId;

#[derive(Debug, Clone)]
pub struct CompositionGraph<S> {
    store: S,
}

impl<S: CompositionStore> CompositionGraph<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Insert an edge without business-rule validation.
    pub async fn add_edge(
        &self,
        parent_id: DbId,
        child_id: DbId,
    ) -> Result<CompositionEdge, GraphError> {
        let mut unit = self.store.begin().await?;
        match unit.insert_edge(parent_id, child_id).await? {
            EdgeInsert::Inserted(edge) => {
                unit.commit().await?;
                Ok(edge)
            }
            EdgeInsert::Violated(invariant) => Err(GraphError::InvariantViolation(invariant)),
        }
    }

    /// Delete an edge by id. No validation; [`GraphError::NotFound`] if absent.
    pub async fn remove_edge(&self, edge_id: DbId) -> Result<(), GraphError> {
        if self.store.remove_edge(edge_id).await? {
            Ok(())
        } else {
            Err(GraphError::NotFound(edge_id))
        }
    }

    /// Stream all edges in insertion order. Call again to restart.
    pub fn list_edges(&self) -> BoxStream<'_, Result<CompositionEdge, StorageUnavailable>> {
        self.store.list_edges()
    }
}

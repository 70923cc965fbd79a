//! Storage traits for the composition engine.
//!
//! A backend implements [`CompositionStore`] for one-shot operations and
//! hands out a [`CompositionUnit`] for work that must see a consistent
//! snapshot (the validator's read-check-insert sequence). A unit is released
//! by [`CompositionUnit::commit`]; dropping it without committing discards
//! every change made through it.

use std::fmt;
use std::future::Future;

use futures::stream::BoxStream;

use super::model::{CompositionEdge, EdgeDetail, PurchasePair, PurchaseSummary};
use crate::types::DbId;

/// An unexpected storage fault (connection loss, I/O failure, ...).
///
/// The message is meant for logs. Callers must not echo it to end users.
#[derive(Debug, Clone, thiserror::Error)]
#[error("Storage unavailable: {message}")]
pub struct StorageUnavailable {
    message: String,
}

impl StorageUnavailable {
    pub fn new(message: impl fmt::Display) -> Self {
        Self {
            message: message.to_string(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Structural invariants the store enforces on every insert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum Invariant {
    #[error("an edge cannot link a purchase to itself")]
    SelfLink,
    #[error("the ordered pair is already linked")]
    DuplicatePair,
}

/// Errors from [`CompositionGraph`](super::CompositionGraph) operations.
#[derive(Debug, thiserror::Error)]
pub enum GraphError {
    #[error("Invariant violation: {0}")]
    InvariantViolation(Invariant),

    #[error("Composition not found: #{0}")]
    NotFound(DbId),

    #[error(transparent)]
    Storage(#[from] StorageUnavailable),
}

/// Outcome of [`CompositionUnit::insert_edge`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EdgeInsert {
    Inserted(CompositionEdge),
    Violated(Invariant),
}

/// A scoped unit of work holding a consistent view of the store.
pub trait CompositionUnit: Send {
    /// Look up both purchases (with their products' classification) at once.
    ///
    /// Returns `None` unless both exist. Backends must keep the returned rows
    /// stable until the unit ends.
    fn load_pair(
        &mut self,
        parent_id: DbId,
        child_id: DbId,
    ) -> impl Future<Output = Result<Option<PurchasePair>, StorageUnavailable>> + Send;

    /// Whether the ordered pair is already linked.
    fn edge_exists(
        &mut self,
        parent_id: DbId,
        child_id: DbId,
    ) -> impl Future<Output = Result<bool, StorageUnavailable>> + Send;

    /// Insert an edge, refusing self-links and duplicate ordered pairs.
    ///
    /// The duplicate check must be atomic with the insert so two concurrent
    /// units can never both insert the same pair.
    fn insert_edge(
        &mut self,
        parent_id: DbId,
        child_id: DbId,
    ) -> impl Future<Output = Result<EdgeInsert, StorageUnavailable>> + Send;

    /// Make every change visible and release the unit.
    fn commit(self) -> impl Future<Output = Result<(), StorageUnavailable>> + Send;
}

/// A composition storage backend.
pub trait CompositionStore: Send + Sync {
    type Unit: CompositionUnit;

    /// Acquire a unit of work.
    fn begin(&self) -> impl Future<Output = Result<Self::Unit, StorageUnavailable>> + Send;

    /// Delete one edge. Returns `false` if no edge had that id.
    fn remove_edge(
        &self,
        edge_id: DbId,
    ) -> impl Future<Output = Result<bool, StorageUnavailable>> + Send;

    /// Stream every edge in insertion order.
    ///
    /// Each call starts a fresh, finite stream.
    fn list_edges(&self) -> BoxStream<'_, Result<CompositionEdge, StorageUnavailable>>;

    /// Every edge joined with display data, in insertion order.
    fn edge_details(
        &self,
    ) -> impl Future<Output = Result<Vec<EdgeDetail>, StorageUnavailable>> + Send;

    /// Child purchases linked under `parent_id`.
    fn children_of(
        &self,
        parent_id: DbId,
    ) -> impl Future<Output = Result<Vec<PurchaseSummary>, StorageUnavailable>> + Send;

    /// Parent purchases linked above `child_id`.
    fn parents_of(
        &self,
        child_id: DbId,
    ) -> impl Future<Output = Result<Vec<PurchaseSummary>, StorageUnavailable>> + Send;

    /// Purchases owned by `user_id` whose product classification matches.
    fn purchases_owned_by(
        &self,
        user_id: DbId,
        is_parent_type: bool,
    ) -> impl Future<Output = Result<Vec<PurchaseSummary>, StorageUnavailable>> + Send;

    /// Every purchase with an owner, newest purchase date first.
    fn owned_purchases(
        &self,
    ) -> impl Future<Output = Result<Vec<PurchaseSummary>, StorageUnavailable>> + Send;
}

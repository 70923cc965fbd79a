//! In-process composition store.
//!
//! Holds users, products, purchases and edges behind one async mutex. A
//! [`MemoryUnit`] owns the lock for its whole lifetime, so units are fully
//! serialized and see a consistent snapshot. Edge inserts are staged in the
//! unit and only published on commit.
//!
//! Only the structural invariants are enforced on insert; like the graph
//! store in PostgreSQL, business rules are the validator's job.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::NaiveDate;
use futures::stream::{self, BoxStream, StreamExt};
use tokio::sync::{Mutex, OwnedMutexGuard};

use super::model::{CompositionEdge, EdgeDetail, PurchaseFacts, PurchasePair, PurchaseSummary};
use super::store::{
    CompositionStore, CompositionUnit, EdgeInsert, Invariant, StorageUnavailable,
};
use crate::error::CoreError;
use crate::types::DbId;

#[derive(Debug, Clone)]
struct ProductRecord {
    name: String,
    is_parent_type: bool,
}

/// A purchase held by the memory store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PurchaseRecord {
    pub id: DbId,
    pub product_id: DbId,
    pub owner_user_id: Option<DbId>,
    pub serial_number: Option<String>,
    pub purchase_date: NaiveDate,
}

impl PurchaseRecord {
    /// A purchase dated today with no serial number.
    pub fn new(id: DbId, product_id: DbId, owner_user_id: Option<DbId>) -> Self {
        Self {
            id,
            product_id,
            owner_user_id,
            serial_number: None,
            purchase_date: chrono::Utc::now().date_naive(),
        }
    }
}

#[derive(Debug, Default)]
struct MemoryState {
    users: BTreeMap<DbId, String>,
    products: BTreeMap<DbId, ProductRecord>,
    purchases: BTreeMap<DbId, PurchaseRecord>,
    edges: Vec<CompositionEdge>,
    next_edge_id: DbId,
}

impl MemoryState {
    fn facts(&self, purchase_id: DbId) -> Option<PurchaseFacts> {
        let purchase = self.purchases.get(&purchase_id)?;
        let product = self.products.get(&purchase.product_id)?;
        Some(PurchaseFacts {
            id: purchase.id,
            product_id: purchase.product_id,
            owner_user_id: purchase.owner_user_id,
            is_parent_type: product.is_parent_type,
        })
    }

    fn pair(&self, parent_id: DbId, child_id: DbId) -> Option<PurchasePair> {
        Some(PurchasePair {
            parent: self.facts(parent_id)?,
            child: self.facts(child_id)?,
        })
    }

    fn summary(&self, purchase_id: DbId) -> Option<PurchaseSummary> {
        let purchase = self.purchases.get(&purchase_id)?;
        let product = self.products.get(&purchase.product_id)?;
        Some(PurchaseSummary {
            id: purchase.id,
            product_id: purchase.product_id,
            product_name: product.name.clone(),
            is_parent_type: product.is_parent_type,
            owner_user_id: purchase.owner_user_id,
            owner_name: purchase
                .owner_user_id
                .and_then(|user_id| self.users.get(&user_id).cloned()),
            serial_number: purchase.serial_number.clone(),
            purchase_date: purchase.purchase_date,
        })
    }

    fn detail(&self, edge: &CompositionEdge) -> Option<EdgeDetail> {
        let parent = self.summary(edge.parent_purchase_id)?;
        let child = self.summary(edge.child_purchase_id)?;
        Some(EdgeDetail {
            id: edge.id,
            parent_purchase_id: parent.id,
            child_purchase_id: child.id,
            parent_serial_number: parent.serial_number,
            child_serial_number: child.serial_number,
            parent_product_name: parent.product_name,
            child_product_name: child.product_name,
            parent_owner_name: parent.owner_name,
            child_owner_name: child.owner_name,
            created_at: edge.created_at,
        })
    }

    fn has_edge(&self, parent_id: DbId, child_id: DbId) -> bool {
        self.edges
            .iter()
            .any(|e| e.parent_purchase_id == parent_id && e.child_purchase_id == child_id)
    }
}

/// Cheaply cloneable handle to a shared in-memory store.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    state: Arc<Mutex<MemoryState>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn add_user(&self, id: DbId, name: &str) {
        self.state.lock().await.users.insert(id, name.to_string());
    }

    pub async fn add_product(&self, id: DbId, name: &str, is_parent_type: bool) {
        self.state.lock().await.products.insert(
            id,
            ProductRecord {
                name: name.to_string(),
                is_parent_type,
            },
        );
    }

    /// Add a purchase dated today. The product must already exist.
    pub async fn add_purchase(
        &self,
        id: DbId,
        product_id: DbId,
        owner_user_id: Option<DbId>,
    ) -> Result<(), CoreError> {
        self.insert_purchase(PurchaseRecord::new(id, product_id, owner_user_id))
            .await
    }

    pub async fn insert_purchase(&self, purchase: PurchaseRecord) -> Result<(), CoreError> {
        let mut state = self.state.lock().await;
        if !state.products.contains_key(&purchase.product_id) {
            return Err(CoreError::NotFound {
                entity: "Product",
                id: purchase.product_id,
            });
        }
        state.purchases.insert(purchase.id, purchase);
        Ok(())
    }

    /// Both purchases with their classification, if both exist.
    pub async fn pair(&self, parent_id: DbId, child_id: DbId) -> Option<PurchasePair> {
        self.state.lock().await.pair(parent_id, child_id)
    }

    pub async fn edge_count(&self) -> usize {
        self.state.lock().await.edges.len()
    }

    async fn summaries(
        &self,
        select: impl FnOnce(&MemoryState) -> Vec<DbId>,
    ) -> Vec<PurchaseSummary> {
        let state = self.state.lock().await;
        select(&state)
            .into_iter()
            .filter_map(|id| state.summary(id))
            .collect()
    }
}

/// Exclusive unit of work over a [`MemoryStore`].
pub struct MemoryUnit {
    state: OwnedMutexGuard<MemoryState>,
    staged: Vec<CompositionEdge>,
}

impl CompositionUnit for MemoryUnit {
    async fn load_pair(
        &mut self,
        parent_id: DbId,
        child_id: DbId,
    ) -> Result<Option<PurchasePair>, StorageUnavailable> {
        Ok(self.state.pair(parent_id, child_id))
    }

    async fn edge_exists(
        &mut self,
        parent_id: DbId,
        child_id: DbId,
    ) -> Result<bool, StorageUnavailable> {
        Ok(self.state.has_edge(parent_id, child_id)
            || self
                .staged
                .iter()
                .any(|e| e.parent_purchase_id == parent_id && e.child_purchase_id == child_id))
    }

    async fn insert_edge(
        &mut self,
        parent_id: DbId,
        child_id: DbId,
    ) -> Result<EdgeInsert, StorageUnavailable> {
        if parent_id == child_id {
            return Ok(EdgeInsert::Violated(Invariant::SelfLink));
        }
        if self.edge_exists(parent_id, child_id).await? {
            return Ok(EdgeInsert::Violated(Invariant::DuplicatePair));
        }
        self.state.next_edge_id += 1;
        let edge = CompositionEdge {
            id: self.state.next_edge_id,
            parent_purchase_id: parent_id,
            child_purchase_id: child_id,
            created_at: chrono::Utc::now(),
        };
        self.staged.push(edge.clone());
        Ok(EdgeInsert::Inserted(edge))
    }

    async fn commit(mut self) -> Result<(), StorageUnavailable> {
        let staged = std::mem::take(&mut self.staged);
        self.state.edges.extend(staged);
        Ok(())
    }
}

impl CompositionStore for MemoryStore {
    type Unit = MemoryUnit;

    async fn begin(&self) -> Result<MemoryUnit, StorageUnavailable> {
        Ok(MemoryUnit {
            state: Arc::clone(&self.state).lock_owned().await,
            staged: Vec::new(),
        })
    }

    async fn remove_edge(&self, edge_id: DbId) -> Result<bool, StorageUnavailable> {
        let mut state = self.state.lock().await;
        let before = state.edges.len();
        state.edges.retain(|e| e.id != edge_id);
        Ok(state.edges.len() != before)
    }

    fn list_edges(&self) -> BoxStream<'_, Result<CompositionEdge, StorageUnavailable>> {
        let state = Arc::clone(&self.state);
        stream::once(async move { state.lock().await.edges.clone() })
            .flat_map(|edges| stream::iter(edges.into_iter().map(Ok)))
            .boxed()
    }

    async fn edge_details(&self) -> Result<Vec<EdgeDetail>, StorageUnavailable> {
        let state = self.state.lock().await;
        Ok(state.edges.iter().filter_map(|e| state.detail(e)).collect())
    }

    async fn children_of(
        &self,
        parent_id: DbId,
    ) -> Result<Vec<PurchaseSummary>, StorageUnavailable> {
        Ok(self
            .summaries(|s| {
                s.edges
                    .iter()
                    .filter(|e| e.parent_purchase_id == parent_id)
                    .map(|e| e.child_purchase_id)
                    .collect()
            })
            .await)
    }

    async fn parents_of(&self, child_id: DbId) -> Result<Vec<PurchaseSummary>, StorageUnavailable> {
        Ok(self
            .summaries(|s| {
                s.edges
                    .iter()
                    .filter(|e| e.child_purchase_id == child_id)
                    .map(|e| e.parent_purchase_id)
                    .collect()
            })
            .await)
    }

    async fn purchases_owned_by(
        &self,
        user_id: DbId,
        is_parent_type: bool,
    ) -> Result<Vec<PurchaseSummary>, StorageUnavailable> {
        Ok(self
            .summaries(|s| {
                s.purchases
                    .values()
                    .filter(|p| p.owner_user_id == Some(user_id))
                    .filter(|p| {
                        s.products
                            .get(&p.product_id)
                            .is_some_and(|product| product.is_parent_type == is_parent_type)
                    })
                    .map(|p| p.id)
                    .collect()
            })
            .await)
    }

    async fn owned_purchases(&self) -> Result<Vec<PurchaseSummary>, StorageUnavailable> {
        let mut owned = self
            .summaries(|s| {
                s.purchases
                    .values()
                    .filter(|p| p.owner_user_id.is_some())
                    .map(|p| p.id)
                    .collect()
            })
            .await;
        owned.sort_by(|a, b| (b.purchase_date, b.id).cmp(&(a.purchase_date, a.id)));
        Ok(owned)
    }
}

//! Read projections over the composition graph.

use super::model::{EdgeDetail, PurchaseSummary};
use super::store::{CompositionStore, StorageUnavailable};
use crate::types::DbId;

#[derive(Debug, Clone)]
pub struct CompositionQueries<S> {
    store: S,
}

impl<S: CompositionStore> CompositionQueries<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// All component purchases linked under `parent_id`.
    pub async fn components_of(
        &self,
        parent_id: DbId,
    ) -> Result<Vec<PurchaseSummary>, StorageUnavailable> {
        self.store.children_of(parent_id).await
    }

    /// All parent purchases `child_id` is linked under (possibly several).
    pub async fn parents_of(
        &self,
        child_id: DbId,
    ) -> Result<Vec<PurchaseSummary>, StorageUnavailable> {
        self.store.parents_of(child_id).await
    }

    /// Whether the purchase is currently a component of anything.
    pub async fn is_component(&self, purchase_id: DbId) -> Result<bool, StorageUnavailable> {
        Ok(!self.store.parents_of(purchase_id).await?.is_empty())
    }

    /// Purchases of `user_id` that could be the parent side of an edge.
    pub async fn eligible_parents(
        &self,
        user_id: DbId,
    ) -> Result<Vec<PurchaseSummary>, StorageUnavailable> {
        self.store.purchases_owned_by(user_id, true).await
    }

    /// Purchases of `user_id` that could be the component side of an edge.
    pub async fn eligible_children(
        &self,
        user_id: DbId,
    ) -> Result<Vec<PurchaseSummary>, StorageUnavailable> {
        self.store.purchases_owned_by(user_id, false).await
    }

    /// Every purchase that has an owner, newest first.
    pub async fn assignable_purchases(&self) -> Result<Vec<PurchaseSummary>, StorageUnavailable> {
        self.store.owned_purchases().await
    }

    /// Every edge with display data for both sides.
    pub async fn edge_details(&self) -> Result<Vec<EdgeDetail>, StorageUnavailable> {
        self.store.edge_details().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::composition::memory::MemoryStore;
    use crate::composition::RelationshipValidator;

    const U1: DbId = 1;
    const U2: DbId = 2;

    /// Laptops 1 and 2 and RAM 3 for U1; SSD 4 for U2; unowned laptop 5.
    async fn fixture() -> MemoryStore {
        let store = MemoryStore::new();
        store.add_user(U1, "Ana").await;
        store.add_user(U2, "Luis").await;
        store.add_product(10, "Laptop", true).await;
        store.add_product(20, "RAM", false).await;
        store.add_product(30, "SSD", false).await;
        store.add_purchase(1, 10, Some(U1)).await.unwrap();
        store.add_purchase(2, 10, Some(U1)).await.unwrap();
        store.add_purchase(3, 20, Some(U1)).await.unwrap();
        store.add_purchase(4, 30, Some(U2)).await.unwrap();
        store.add_purchase(5, 10, None).await.unwrap();
        store
    }

    fn ids(purchases: &[PurchaseSummary]) -> Vec<DbId> {
        purchases.iter().map(|p| p.id).collect()
    }

    #[tokio::test]
    async fn components_and_parents_follow_edges() {
        let store = fixture().await;
        let validator = RelationshipValidator::new(store.clone());
        validator.propose(1_i64, 3_i64).await.unwrap();
        validator.propose(2_i64, 3_i64).await.unwrap();
        let queries = CompositionQueries::new(store);

        assert_eq!(ids(&queries.components_of(1).await.unwrap()), vec![3]);
        assert_eq!(ids(&queries.parents_of(3).await.unwrap()), vec![1, 2]);
        assert!(queries.is_component(3).await.unwrap());
        assert!(!queries.is_component(1).await.unwrap());
        assert!(queries.components_of(4).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn eligibility_is_by_owner_and_classification() {
        let queries = CompositionQueries::new(fixture().await);

        assert_eq!(ids(&queries.eligible_parents(U1).await.unwrap()), vec![1, 2]);
        assert_eq!(ids(&queries.eligible_children(U1).await.unwrap()), vec![3]);
        assert!(queries.eligible_parents(U2).await.unwrap().is_empty());
        assert_eq!(ids(&queries.eligible_children(U2).await.unwrap()), vec![4]);
    }

    #[tokio::test]
    async fn assignable_purchases_skip_unowned() {
        let queries = CompositionQueries::new(fixture().await);

        let assignable = ids(&queries.assignable_purchases().await.unwrap());

        assert_eq!(assignable.len(), 4);
        assert!(!assignable.contains(&5));
    }

    #[tokio::test]
    async fn edge_details_carry_names() {
        let store = fixture().await;
        RelationshipValidator::new(store.clone())
            .propose(1_i64, 3_i64)
            .await
            .unwrap();

        let details = CompositionQueries::new(store).edge_details().await.unwrap();

        assert_eq!(details.len(), 1);
        assert_eq!(details[0].parent_product_name, "Laptop");
        assert_eq!(details[0].child_product_name, "RAM");
        assert_eq!(details[0].parent_owner_name.as_deref(), Some("Ana"));
        assert_eq!(details[0].child_owner_name.as_deref(), Some("Ana"));
    }
}

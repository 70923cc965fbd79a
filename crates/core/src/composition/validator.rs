//! The relationship validator: decides and records proposed edges.

use super::ids::SelectionId;
use super::rules::{self, Decision, PairContext, RejectionReason, Selection};
use super::store::{CompositionStore, CompositionUnit, EdgeInsert, StorageUnavailable};

/// Applies the rule chain to proposed edges and commits the accepted ones.
#[derive(Debug, Clone)]
pub struct RelationshipValidator<S> {
    store: S,
}

impl<S: CompositionStore> RelationshipValidator<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Propose a `parent -> child` edge.
    ///
    /// Business-rule failures come back as [`Decision::Rejected`]; only
    /// storage faults are errors. The lookups, the rule checks and the insert
    /// all run inside one unit of work, and nothing is written unless every
    /// rule holds.
    pub async fn propose(
        &self,
        parent: impl Into<SelectionId>,
        child: impl Into<SelectionId>,
    ) -> Result<Decision, StorageUnavailable> {
        let selection = Selection::new(parent, child);
        if let Err(reason) = rules::check_selection(&selection) {
            return Ok(reason.into());
        }
        let Some((parent_id, child_id)) = selection.resolved() else {
            return Ok(RejectionReason::PurchaseNotFound.into());
        };

        let mut unit = self.store.begin().await?;

        let pair = unit.load_pair(parent_id, child_id).await?;
        let edge_exists = match pair {
            Some(_) => unit.edge_exists(parent_id, child_id).await?,
            None => false,
        };
        if let Err(reason) = rules::check_pair(&PairContext { pair, edge_exists }) {
            return Ok(reason.into());
        }

        match unit.insert_edge(parent_id, child_id).await? {
            EdgeInsert::Inserted(edge) => {
                unit.commit().await?;
                Ok(Decision::Accepted { edge })
            }
            // Lost a race against a concurrent proposal for the same pair.
            EdgeInsert::Violated(invariant) => Ok(RejectionReason::from(invariant).into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use futures::TryStreamExt;

    use super::*;
    use crate::composition::memory::MemoryStore;
    use crate::composition::CompositionGraph;
    use crate::types::DbId;

    const U1: DbId = 1;
    const U2: DbId = 2;
    const LAPTOP: DbId = 10;
    const RAM: DbId = 20;

    async fn catalog() -> MemoryStore {
        let store = MemoryStore::new();
        store.add_product(LAPTOP, "Laptop", true).await;
        store.add_product(RAM, "RAM", false).await;
        store
    }

    #[tokio::test]
    async fn scenario_laptop_with_ram_is_accepted() {
        let store = catalog().await;
        store.add_purchase(1, LAPTOP, Some(U1)).await.unwrap();
        store.add_purchase(2, RAM, Some(U1)).await.unwrap();

        let decision = RelationshipValidator::new(store.clone())
            .propose(1_i64, 2_i64)
            .await
            .unwrap();

        assert_matches!(
            decision,
            Decision::Accepted { edge }
                if edge.parent_purchase_id == 1 && edge.child_purchase_id == 2
        );
        assert_eq!(store.edge_count().await, 1);
    }

    #[tokio::test]
    async fn scenario_owner_mismatch() {
        let store = catalog().await;
        store.add_purchase(1, LAPTOP, Some(U1)).await.unwrap();
        store.add_purchase(2, RAM, Some(U2)).await.unwrap();

        let decision = RelationshipValidator::new(store.clone())
            .propose(1_i64, 2_i64)
            .await
            .unwrap();

        assert_eq!(decision.rejection(), Some(RejectionReason::OwnerMismatch));
        assert_eq!(store.edge_count().await, 0);
    }

    #[tokio::test]
    async fn scenario_component_cannot_be_parent() {
        let store = catalog().await;
        store.add_purchase(1, RAM, Some(U1)).await.unwrap();
        store.add_purchase(2, RAM, Some(U1)).await.unwrap();

        let decision = RelationshipValidator::new(store)
            .propose(1_i64, 2_i64)
            .await
            .unwrap();

        assert_eq!(
            decision.rejection(),
            Some(RejectionReason::ParentNotCompositeCapable)
        );
    }

    #[tokio::test]
    async fn scenario_repeat_is_duplicate() {
        let store = catalog().await;
        store.add_purchase(1, LAPTOP, Some(U1)).await.unwrap();
        store.add_purchase(2, RAM, Some(U1)).await.unwrap();
        let validator = RelationshipValidator::new(store.clone());

        assert!(validator.propose(1_i64, 2_i64).await.unwrap().is_accepted());
        let again = validator.propose("1", " 2").await.unwrap();

        assert_eq!(again.rejection(), Some(RejectionReason::DuplicateEdge));
        assert_eq!(store.edge_count().await, 1);
    }

    #[tokio::test]
    async fn scenario_self_link() {
        let store = catalog().await;
        store.add_purchase(1, LAPTOP, Some(U1)).await.unwrap();

        let decision = RelationshipValidator::new(store)
            .propose(1_i64, "01")
            .await
            .unwrap();

        assert_eq!(decision.rejection(), Some(RejectionReason::SelfLink));
    }

    #[tokio::test]
    async fn scenario_unknown_purchase() {
        let store = catalog().await;
        store.add_purchase(2, RAM, Some(U1)).await.unwrap();

        let decision = RelationshipValidator::new(store)
            .propose(999_i64, 2_i64)
            .await
            .unwrap();

        assert_eq!(decision.rejection(), Some(RejectionReason::PurchaseNotFound));
    }

    #[tokio::test]
    async fn blank_selection_is_missing() {
        let validator = RelationshipValidator::new(catalog().await);

        let decision = validator.propose("", 2_i64).await.unwrap();

        assert_eq!(decision.rejection(), Some(RejectionReason::MissingSelection));
    }

    #[tokio::test]
    async fn text_selection_is_not_found() {
        let store = catalog().await;
        store.add_purchase(2, RAM, Some(U1)).await.unwrap();

        let decision = RelationshipValidator::new(store)
            .propose("laptop", 2_i64)
            .await
            .unwrap();

        assert_eq!(decision.rejection(), Some(RejectionReason::PurchaseNotFound));
    }

    #[tokio::test]
    async fn unowned_purchase_is_rejected() {
        let store = catalog().await;
        store.add_purchase(1, LAPTOP, None).await.unwrap();
        store.add_purchase(2, RAM, Some(U1)).await.unwrap();

        let decision = RelationshipValidator::new(store)
            .propose(1_i64, 2_i64)
            .await
            .unwrap();

        assert_eq!(decision.rejection(), Some(RejectionReason::UnownedPurchase));
    }

    #[tokio::test]
    async fn reversed_direction_is_an_independent_decision() {
        let store = catalog().await;
        store.add_purchase(1, LAPTOP, Some(U1)).await.unwrap();
        store.add_purchase(2, RAM, Some(U1)).await.unwrap();
        let validator = RelationshipValidator::new(store.clone());

        assert!(validator.propose(1_i64, 2_i64).await.unwrap().is_accepted());
        let reversed = validator.propose(2_i64, 1_i64).await.unwrap();

        assert_eq!(
            reversed.rejection(),
            Some(RejectionReason::ParentNotCompositeCapable)
        );
        assert_eq!(store.edge_count().await, 1);
    }

    #[tokio::test]
    async fn both_directions_fail_between_components() {
        let store = catalog().await;
        store.add_purchase(1, RAM, Some(U1)).await.unwrap();
        store.add_purchase(2, RAM, Some(U1)).await.unwrap();
        let validator = RelationshipValidator::new(store);

        for (a, b) in [(1_i64, 2_i64), (2, 1)] {
            let decision = validator.propose(a, b).await.unwrap();
            assert_eq!(
                decision.rejection(),
                Some(RejectionReason::ParentNotCompositeCapable)
            );
        }
    }

    /// A component may sit under several parents at once; nothing forbids it.
    #[tokio::test]
    async fn component_can_be_linked_under_two_parents() {
        let store = catalog().await;
        store.add_purchase(1, LAPTOP, Some(U1)).await.unwrap();
        store.add_purchase(2, LAPTOP, Some(U1)).await.unwrap();
        store.add_purchase(3, RAM, Some(U1)).await.unwrap();
        let validator = RelationshipValidator::new(store.clone());

        assert!(validator.propose(1_i64, 3_i64).await.unwrap().is_accepted());
        assert!(validator.propose(2_i64, 3_i64).await.unwrap().is_accepted());
        assert_eq!(store.edge_count().await, 2);
    }

    #[tokio::test]
    async fn concurrent_identical_proposals_accept_once() {
        let store = catalog().await;
        store.add_purchase(1, LAPTOP, Some(U1)).await.unwrap();
        store.add_purchase(2, RAM, Some(U1)).await.unwrap();

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let validator = RelationshipValidator::new(store.clone());
                tokio::spawn(async move { validator.propose(1_i64, 2_i64).await })
            })
            .collect();

        let mut accepted = 0;
        for handle in handles {
            match handle.await.unwrap().unwrap() {
                Decision::Accepted { .. } => accepted += 1,
                Decision::Rejected { reason } => {
                    assert_eq!(reason, RejectionReason::DuplicateEdge)
                }
            }
        }
        assert_eq!(accepted, 1);
    }

    /// After an arbitrary mix of proposals every stored edge satisfies the
    /// structural, classification and ownership invariants.
    #[tokio::test]
    async fn invariants_hold_after_mixed_proposals() {
        let store = catalog().await;
        let owners = [Some(U1), Some(U2), None];
        let mut id = 0;
        for product in [LAPTOP, RAM] {
            for owner in owners {
                for _ in 0..2 {
                    id += 1;
                    store.add_purchase(id, product, owner).await.unwrap();
                }
            }
        }
        let validator = RelationshipValidator::new(store.clone());
        for parent in 0..=id + 1 {
            for child in 0..=id + 1 {
                validator.propose(parent, child).await.unwrap();
                validator.propose(parent, child).await.unwrap();
            }
        }

        let edges: Vec<_> = CompositionGraph::new(store.clone())
            .list_edges()
            .try_collect()
            .await
            .unwrap();
        assert!(!edges.is_empty());

        let mut seen = std::collections::HashSet::new();
        for edge in &edges {
            assert_ne!(edge.parent_purchase_id, edge.child_purchase_id);
            assert!(seen.insert((edge.parent_purchase_id, edge.child_purchase_id)));

            let pair = store
                .pair(edge.parent_purchase_id, edge.child_purchase_id)
                .await
                .expect("edge endpoints exist");
            assert!(pair.parent.is_parent_type);
            assert!(!pair.child.is_parent_type);
            assert!(pair.parent.owner_user_id.is_some());
            assert_eq!(pair.parent.owner_user_id, pair.child.owner_user_id);
        }
        // Two owners, two laptops and two RAM modules each.
        assert_eq!(edges.len(), 2 * 2 * 2);
    }
}

//! The ordered rule chain for proposed composition edges.
//!
//! Rules are data: each [`Rule`] pairs a predicate with the
//! [`RejectionReason`] reported when the predicate does not hold. Rules are
//! evaluated strictly in order and the first failure wins, so the reported
//! reason is deterministic for any input.
//!
//! Evaluation happens in two stages because the second one needs storage
//! reads keyed by the normalized ids:
//!
//! 1. [`SELECTION_RULES`] over the raw [`Selection`] (no I/O).
//! 2. [`PAIR_RULES`] over a [`PairContext`] built from one combined lookup.

use serde::Serialize;

use super::ids::SelectionId;
use super::model::{CompositionEdge, PurchasePair};
use super::store::Invariant;
use crate::types::DbId;

// ---------------------------------------------------------------------------
// Outcomes
// ---------------------------------------------------------------------------

/// Why a proposed edge was refused. Closed set, one per rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, thiserror::Error)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RejectionReason {
    #[error("Both a parent purchase and a component purchase must be selected")]
    MissingSelection,
    #[error("A purchase cannot be linked to itself")]
    SelfLink,
    #[error("One or both purchases do not exist")]
    PurchaseNotFound,
    #[error("Both purchases must be assigned to a user")]
    UnownedPurchase,
    #[error("Only purchases assigned to the same user can be linked")]
    OwnerMismatch,
    #[error("The parent purchase must be of a parent-type product (e.g. a computer)")]
    ParentNotCompositeCapable,
    #[error("The component purchase must be of a component-type product (e.g. RAM, SSD)")]
    ChildNotComponentType,
    #[error("This composition already exists")]
    DuplicateEdge,
}

impl RejectionReason {
    /// Stable machine-readable code.
    pub fn code(self) -> &'static str {
        match self {
            RejectionReason::MissingSelection => "MISSING_SELECTION",
            RejectionReason::SelfLink => "SELF_LINK",
            RejectionReason::PurchaseNotFound => "PURCHASE_NOT_FOUND",
            RejectionReason::UnownedPurchase => "UNOWNED_PURCHASE",
            RejectionReason::OwnerMismatch => "OWNER_MISMATCH",
            RejectionReason::ParentNotCompositeCapable => "PARENT_NOT_COMPOSITE_CAPABLE",
            RejectionReason::ChildNotComponentType => "CHILD_NOT_COMPONENT_TYPE",
            RejectionReason::DuplicateEdge => "DUPLICATE_EDGE",
        }
    }
}

impl From<Invariant> for RejectionReason {
    fn from(invariant: Invariant) -> Self {
        match invariant {
            Invariant::SelfLink => RejectionReason::SelfLink,
            Invariant::DuplicatePair => RejectionReason::DuplicateEdge,
        }
    }
}

/// Result of proposing an edge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Decision {
    Accepted { edge: CompositionEdge },
    Rejected { reason: RejectionReason },
}

impl Decision {
    pub fn is_accepted(&self) -> bool {
        matches!(self, Decision::Accepted { .. })
    }

    pub fn rejection(&self) -> Option<RejectionReason> {
        match self {
            Decision::Accepted { .. } => None,
            Decision::Rejected { reason } => Some(*reason),
        }
    }
}

impl From<RejectionReason> for Decision {
    fn from(reason: RejectionReason) -> Self {
        Decision::Rejected { reason }
    }
}

// ---------------------------------------------------------------------------
// Rule chain
// ---------------------------------------------------------------------------

/// A predicate and the reason reported when it does not hold.
pub struct Rule<T> {
    pub reason: RejectionReason,
    pub holds: fn(&T) -> bool,
}

/// The caller's two selections, normalized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    pub parent: SelectionId,
    pub child: SelectionId,
}

impl Selection {
    pub fn new(parent: impl Into<SelectionId>, child: impl Into<SelectionId>) -> Self {
        Self {
            parent: parent.into(),
            child: child.into(),
        }
    }

    /// Both canonical ids, when both selections can be looked up.
    pub fn resolved(&self) -> Option<(DbId, DbId)> {
        Some((self.parent.as_id()?, self.child.as_id()?))
    }
}

/// Everything the storage-backed rules need, gathered in one unit of work.
#[derive(Debug, Clone, Default)]
pub struct PairContext {
    /// `None` when either purchase does not exist.
    pub pair: Option<PurchasePair>,
    /// Whether the ordered pair is already linked.
    pub edge_exists: bool,
}

impl PairContext {
    fn pair_holds(&self, predicate: impl Fn(&PurchasePair) -> bool) -> bool {
        self.pair.as_ref().is_some_and(predicate)
    }
}

/// Steps 1-2: checks on the selections themselves.
pub const SELECTION_RULES: &[Rule<Selection>] = &[
    Rule {
        reason: RejectionReason::MissingSelection,
        holds: |s| s.parent.is_present() && s.child.is_present(),
    },
    Rule {
        reason: RejectionReason::SelfLink,
        holds: |s| s.parent != s.child,
    },
];

/// Steps 3-8: checks against the ledger, catalog and existing edges.
pub const PAIR_RULES: &[Rule<PairContext>] = &[
    Rule {
        reason: RejectionReason::PurchaseNotFound,
        holds: |c| c.pair.is_some(),
    },
    Rule {
        reason: RejectionReason::UnownedPurchase,
        holds: |c| {
            c.pair_holds(|p| p.parent.owner_user_id.is_some() && p.child.owner_user_id.is_some())
        },
    },
    Rule {
        reason: RejectionReason::OwnerMismatch,
        holds: |c| c.pair_holds(|p| p.parent.owner_user_id == p.child.owner_user_id),
    },
    Rule {
        reason: RejectionReason::ParentNotCompositeCapable,
        holds: |c| c.pair_holds(|p| p.parent.is_parent_type),
    },
    Rule {
        reason: RejectionReason::ChildNotComponentType,
        holds: |c| c.pair_holds(|p| !p.child.is_parent_type),
    },
    Rule {
        reason: RejectionReason::DuplicateEdge,
        holds: |c| !c.edge_exists,
    },
];

/// Return the reason of the first rule that does not hold.
pub fn first_failure<T>(rules: &[Rule<T>], subject: &T) -> Option<RejectionReason> {
    rules
        .iter()
        .find(|rule| !(rule.holds)(subject))
        .map(|rule| rule.reason)
}

/// Run the selection stage.
pub fn check_selection(selection: &Selection) -> Result<(), RejectionReason> {
    match first_failure(SELECTION_RULES, selection) {
        Some(reason) => Err(reason),
        None => Ok(()),
    }
}

/// Run the storage-backed stage.
pub fn check_pair(context: &PairContext) -> Result<(), RejectionReason> {
    match first_failure(PAIR_RULES, context) {
        Some(reason) => Err(reason),
        None => Ok(()),
    }
}

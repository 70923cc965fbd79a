//! Purchase composition engine.
//!
//! Decides whether a purchase (e.g. a laptop) may have another purchase
//! (e.g. a RAM module) attached to it as a component, and keeps the resulting
//! parent -> child graph consistent:
//!
//! - [`rules`]: the ordered rule chain, pure functions only.
//! - [`validator`]: runs the rule chain against a store and commits accepted edges.
//! - [`graph`]: edge CRUD with store-level invariant checks.
//! - [`queries`]: read projections used by listings and forms.
//! - [`store`]: the storage traits every backend implements.
//! - [`memory`]: an in-process backend.

pub mod graph;
pub mod ids;
pub mod memory;
pub mod model;
pub mod queries;
pub mod rules;
pub mod store;
pub mod validator;

pub use graph::CompositionGraph;
pub use ids::SelectionId;
pub use model::{CompositionEdge, EdgeDetail, PurchaseFacts, PurchasePair, PurchaseSummary};
pub use queries::CompositionQueries;
pub use rules::{Decision, RejectionReason};
pub use store::{CompositionStore, CompositionUnit, GraphError, Invariant, StorageUnavailable};
pub use validator::RelationshipValidator;

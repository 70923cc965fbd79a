use std::sync::Arc;

use inventory_core::composition::{CompositionGraph, CompositionQueries, RelationshipValidator};
use inventory_db::PgCompositionStore;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheaply cloneable: the pool is reference counted and the config sits behind `Arc`.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: inventory_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
}

impl AppState {
    pub fn new(pool: inventory_db::DbPool, config: ServerConfig) -> Self {
        Self {
            pool,
            config: Arc::new(config),
        }
    }

    fn store(&self) -> PgCompositionStore {
        PgCompositionStore::new(self.pool.clone())
    }

    pub fn validator(&self) -> RelationshipValidator<PgCompositionStore> {
        RelationshipValidator::new(self.store())
    }

    pub fn graph(&self) -> CompositionGraph<PgCompositionStore> {
        CompositionGraph::new(self.store())
    }

    pub fn queries(&self) -> CompositionQueries<PgCompositionStore> {
        CompositionQueries::new(self.store())
    }
}

use crate::composition::store::{GraphError, StorageUnavailable};
use crate::types::DbId;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error(transparent)]
    Storage(#[from] StorageUnavailable),
}

impl From<GraphError> for CoreError {
    fn from(err: GraphError) -> Self {
        match err {
            GraphError::NotFound(id) => CoreError::NotFound {
                entity: "Composition",
                id,
            },
            GraphError::InvariantViolation(invariant) => CoreError::Conflict(invariant.to_string()),
            GraphError::Storage(err) => CoreError::Storage(err),
        }
    }
}

//! Route definitions for the `/compositions` resource.

use axum::routing::{delete, get};
use axum::Router;

use crate::handlers::compositions;
use crate::state::AppState;

/// Routes mounted at `/compositions`.
///
/// ```text
/// POST   /           -> propose
/// GET    /           -> list
/// GET    /details    -> details
/// DELETE /{id}       -> delete
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(compositions::list).post(compositions::propose))
        .route("/details", get(compositions::details))
        .route("/{id}", delete(compositions::delete))
}

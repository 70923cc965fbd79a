//! Route definitions for the `/purchases` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::purchases;
use crate::state::AppState;

/// Routes mounted at `/purchases`.
///
/// ```text
/// GET    /assignable          -> assignable
/// GET    /{id}/components     -> components
/// GET    /{id}/parents        -> parents
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/assignable", get(purchases::assignable))
        .route("/{id}/components", get(purchases::components))
        .route("/{id}/parents", get(purchases::parents))
}

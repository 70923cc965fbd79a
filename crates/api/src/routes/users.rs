//! Route definitions for the `/users` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::users;
use crate::state::AppState;

/// Routes mounted at `/users`.
///
/// ```text
/// GET    /{id}/eligible-parents     -> eligible_parents
/// GET    /{id}/eligible-children    -> eligible_children
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/{id}/eligible-parents", get(users::eligible_parents))
        .route("/{id}/eligible-children", get(users::eligible_children))
}

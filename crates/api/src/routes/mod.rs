pub mod compositions;
pub mod health;
pub mod purchases;
pub mod users;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /compositions                         propose (POST), list (GET)
/// /compositions/details                 edges with display data
/// /compositions/{id}                    remove (DELETE)
///
/// /purchases/assignable                 purchases with an owner
/// /purchases/{id}/components            components linked under a purchase
/// /purchases/{id}/parents               parents a purchase is linked under
///
/// /users/{id}/eligible-parents          user's parent-type purchases
/// /users/{id}/eligible-children         user's component-type purchases
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/compositions", compositions::router())
        .nest("/purchases", purchases::router())
        .nest("/users", users::router())
}

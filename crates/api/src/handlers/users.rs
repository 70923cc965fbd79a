//! Handlers listing a user's purchases that can take part in a composition.

use axum::extract::{Path, State};
use axum::Json;
use inventory_core::composition::PurchaseSummary;
use inventory_core::error::CoreError;
use inventory_core::types::DbId;
use inventory_db::repositories::UserRepo;

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/users/{id}/eligible-parents
pub async fn eligible_parents(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<PurchaseSummary>>>> {
    ensure_user_exists(&state, id).await?;
    let purchases = state.queries().eligible_parents(id).await?;
    Ok(Json(DataResponse { data: purchases }))
}

/// GET /api/v1/users/{id}/eligible-children
pub async fn eligible_children(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<PurchaseSummary>>>> {
    ensure_user_exists(&state, id).await?;
    let purchases = state.queries().eligible_children(id).await?;
    Ok(Json(DataResponse { data: purchases }))
}

async fn ensure_user_exists(state: &AppState, id: DbId) -> AppResult<()> {
    UserRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "User", id }))?;
    Ok(())
}

//! Handlers for purchase-centric composition views.

use axum::extract::{Path, State};
use axum::Json;
use inventory_core::composition::PurchaseSummary;
use inventory_core::error::CoreError;
use inventory_core::types::DbId;
use inventory_db::repositories::PurchaseRepo;

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/purchases/assignable
///
/// Every purchase with an owner, newest purchase date first.
pub async fn assignable(
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<PurchaseSummary>>>> {
    let purchases = state.queries().assignable_purchases().await?;
    Ok(Json(DataResponse { data: purchases }))
}

/// GET /api/v1/purchases/{id}/components
pub async fn components(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<PurchaseSummary>>>> {
    ensure_purchase_exists(&state, id).await?;
    let components = state.queries().components_of(id).await?;
    Ok(Json(DataResponse { data: components }))
}

/// GET /api/v1/purchases/{id}/parents
pub async fn parents(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<PurchaseSummary>>>> {
    ensure_purchase_exists(&state, id).await?;
    let parents = state.queries().parents_of(id).await?;
    Ok(Json(DataResponse { data: parents }))
}

async fn ensure_purchase_exists(state: &AppState, id: DbId) -> AppResult<()> {
    PurchaseRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Purchase",
            id,
        }))?;
    Ok(())
}

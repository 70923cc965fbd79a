//! Handlers for the `/compositions` resource.
//!
//! Proposals go through the relationship validator; every rejection is
//! returned as an [`AppError::Rejected`] carrying the reason's code and
//! user-facing message.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use futures::TryStreamExt;
use inventory_core::composition::{CompositionEdge, Decision, EdgeDetail, SelectionId};
use inventory_core::types::DbId;
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

/// Request body for proposing a composition.
///
/// Ids may be sent as numbers or numeric strings. Absent, null and blank
/// values are treated as "nothing selected".
#[derive(Debug, Deserialize)]
pub struct ProposeComposition {
    #[serde(default)]
    pub parent_purchase_id: SelectionId,
    #[serde(default)]
    pub child_purchase_id: SelectionId,
}

/// POST /api/v1/compositions
pub async fn propose(
    State(state): State<AppState>,
    Json(input): Json<ProposeComposition>,
) -> AppResult<(StatusCode, Json<DataResponse<CompositionEdge>>)> {
    let decision = state
        .validator()
        .propose(input.parent_purchase_id.clone(), input.child_purchase_id.clone())
        .await?;

    match decision {
        Decision::Accepted { edge } => {
            tracing::info!(
                edge_id = edge.id,
                parent_purchase_id = edge.parent_purchase_id,
                child_purchase_id = edge.child_purchase_id,
                "Composition accepted",
            );
            Ok((StatusCode::CREATED, Json(DataResponse { data: edge })))
        }
        Decision::Rejected { reason } => {
            tracing::info!(
                parent = %input.parent_purchase_id,
                child = %input.child_purchase_id,
                code = reason.code(),
                "Composition rejected",
            );
            Err(AppError::Rejected(reason))
        }
    }
}

/// GET /api/v1/compositions
pub async fn list(
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<CompositionEdge>>>> {
    let graph = state.graph();
    let edges: Vec<CompositionEdge> = graph.list_edges().try_collect().await?;
    Ok(Json(DataResponse { data: edges }))
}

/// GET /api/v1/compositions/details
pub async fn details(
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<EdgeDetail>>>> {
    let details = state.queries().edge_details().await?;
    Ok(Json(DataResponse { data: details }))
}

/// DELETE /api/v1/compositions/{id}
///
/// Removal is unconditional: any existing edge may be deleted.
pub async fn delete(State(state): State<AppState>, Path(id): Path<DbId>) -> AppResult<StatusCode> {
    state.graph().remove_edge(id).await?;
    tracing::info!(edge_id = id, "Composition removed");
    Ok(StatusCode::NO_CONTENT)
}

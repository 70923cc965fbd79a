use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use inventory_core::composition::{GraphError, RejectionReason, StorageUnavailable};
use inventory_core::error::CoreError;
use serde_json::json;

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] for domain errors and carries composition rejections.
/// Implements [`IntoResponse`] to produce consistent
/// `{ "error": ..., "code": ... }` bodies.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `inventory_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A database error from sqlx.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A proposed composition was refused by the rule chain.
    #[error("Rejected: {0}")]
    Rejected(#[from] RejectionReason),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl From<StorageUnavailable> for AppError {
    fn from(err: StorageUnavailable) -> Self {
        AppError::Core(CoreError::Storage(err))
    }
}

impl From<GraphError> for AppError {
    fn from(err: GraphError) -> Self {
        AppError::Core(CoreError::from(err))
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            // --- CoreError variants ---
            AppError::Core(core) => match core {
                CoreError::NotFound { entity, id } => (
                    StatusCode::NOT_FOUND,
                    "NOT_FOUND",
                    format!("{entity} with id {id} not found"),
                ),
                CoreError::Conflict(msg) => (StatusCode::CONFLICT, "CONFLICT", msg.clone()),
                CoreError::Storage(err) => {
                    tracing::error!(error = %err, "Storage unavailable");
                    (
                        StatusCode::SERVICE_UNAVAILABLE,
                        "STORAGE_UNAVAILABLE",
                        "The service is temporarily unavailable, please try again".to_string(),
                    )
                }
            },

            // --- Rule chain rejections ---
            AppError::Rejected(reason) => {
                (rejection_status(*reason), reason.code(), reason.to_string())
            }

            // --- Database errors ---
            AppError::Database(err) => classify_sqlx_error(err),
        };

        let body = json!({
            "error": message,
            "code": code,
        });

        (status, axum::Json(body)).into_response()
    }
}

/// HTTP status for a composition rejection.
///
/// Missing input is a malformed request, unknown purchases are 404, a
/// duplicate pair is a conflict and every other rule failure is 422.
pub fn rejection_status(reason: RejectionReason) -> StatusCode {
    match reason {
        RejectionReason::MissingSelection => StatusCode::BAD_REQUEST,
        RejectionReason::PurchaseNotFound => StatusCode::NOT_FOUND,
        RejectionReason::DuplicateEdge => StatusCode::CONFLICT,
        RejectionReason::SelfLink
        | RejectionReason::UnownedPurchase
        | RejectionReason::OwnerMismatch
        | RejectionReason::ParentNotCompositeCapable
        | RejectionReason::ChildNotComponentType => StatusCode::UNPROCESSABLE_ENTITY,
    }
}

/// Classify a sqlx error into an HTTP status, error code, and message.
///
/// `RowNotFound` maps to 404. Everything else is logged and maps to 500 with
/// a sanitized message.
fn classify_sqlx_error(err: &sqlx::Error) -> (StatusCode, &'static str, String) {
    match err {
        sqlx::Error::RowNotFound => (
            StatusCode::NOT_FOUND,
            "NOT_FOUND",
            "Resource not found".to_string(),
        ),
        other => {
            tracing::error!(error = %other, "Database error");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                "An internal error occurred".to_string(),
            )
        }
    }
}

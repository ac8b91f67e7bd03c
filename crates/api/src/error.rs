use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use docforge_core::error::CoreError;
use docforge_store::{MutateError, StoreError};

/// Error type returned by every HTTP handler.
///
/// Domain failures arrive as [`CoreError`] and keep their classification;
/// storage and HTTP-layer failures get their own variants. The
/// [`IntoResponse`] impl renders all of them as the `{"error", "code"}` JSON
/// body clients parse.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("Storage error: {0}")]
    Store(#[from] StoreError),

    /// Malformed input that serde did not already reject.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Catch-all for failures whose detail must not reach the client.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// What handlers return.
pub type AppResult<T> = Result<T, AppError>;

impl From<MutateError> for AppError {
    fn from(err: MutateError) -> Self {
        match err {
            MutateError::NotFound(id) => AppError::Core(CoreError::NotFound {
                entity: "Project",
                id,
            }),
            MutateError::Contention(id) => AppError::Core(CoreError::Conflict(format!(
                "Project {id} was modified concurrently, please retry"
            ))),
            MutateError::Domain(core) => AppError::Core(core),
            MutateError::Store(store) => AppError::Store(store),
        }
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        AppError::Core(CoreError::Validation(err.to_string()))
    }
}

/// The one 500 shape clients ever see. Detail goes to the log at the call
/// site, never into the body.
fn internal() -> (StatusCode, &'static str, String) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        "INTERNAL_ERROR",
        "An internal error occurred".to_string(),
    )
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Core(core) => match core {
                CoreError::NotFound { entity, id } => (
                    StatusCode::NOT_FOUND,
                    "NOT_FOUND",
                    format!("{entity} with id {id} not found"),
                ),
                CoreError::Validation(msg) => {
                    (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
                }
                CoreError::Conflict(msg) => (StatusCode::CONFLICT, "CONFLICT", msg.clone()),
                CoreError::Unauthorized(msg) => {
                    (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", msg.clone())
                }
                CoreError::Forbidden(msg) => (StatusCode::FORBIDDEN, "FORBIDDEN", msg.clone()),
                CoreError::Internal(msg) => {
                    tracing::error!(error = %msg, "Internal core error");
                    internal()
                }
            },

            AppError::Store(err) => {
                tracing::error!(error = %err, "Storage error");
                internal()
            }

            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
            AppError::Internal(msg) => {
                tracing::error!(error = %msg, "Internal error");
                internal()
            }
        };

        let body = json!({
            "error": message,
            "code": code,
        });

        (status, axum::Json(body)).into_response()
    }
}

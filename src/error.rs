use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Authentication required")]
    Unauthorized,

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    /// No card in the catalog has a resolvable image asset. A configuration
    /// problem, not a transient failure; never retried automatically.
    #[error("Card catalog has no cards with a resolvable image")]
    EmptyCatalog,

    /// Remote store unreachable and no cached daily card to fall back on.
    #[error("Could not resolve today's card: store unreachable and no cached copy")]
    ResolutionFailed,

    /// Transport failure from a store backend, propagated unchanged.
    #[error("Store unavailable: {0}")]
    Store(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// Stable machine-readable kind, so clients can choose message text
    /// without parsing the human-readable message.
    pub fn kind(&self) -> &'static str {
        match self {
            AppError::Unauthorized => "unauthorized",
            AppError::NotFound(_) => "not_found",
            AppError::Validation(_) => "validation",
            AppError::Conflict(_) => "conflict",
            AppError::EmptyCatalog => "empty_catalog",
            AppError::ResolutionFailed => "resolution_failed",
            AppError::Store(_) => "store_unavailable",
            AppError::Database(_) | AppError::Internal(_) => "internal",
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let kind = self.kind();
        let (status, message) = match &self {
            AppError::Unauthorized => (StatusCode::UNAUTHORIZED, self.to_string()),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            AppError::Validation(msg) => (StatusCode::UNPROCESSABLE_ENTITY, msg.clone()),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, msg.clone()),
            AppError::EmptyCatalog => (StatusCode::INTERNAL_SERVER_ERROR, self.to_string()),
            AppError::ResolutionFailed => (StatusCode::SERVICE_UNAVAILABLE, self.to_string()),
            AppError::Store(msg) => {
                tracing::error!(error = %msg, "Store transport error");
                (StatusCode::SERVICE_UNAVAILABLE, "Store unavailable".into())
            }
            AppError::Database(e) => {
                tracing::error!(error = %e, "Database error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".into(),
                )
            }
            AppError::Internal(e) => {
                tracing::error!(error = %e, "Internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".into(),
                )
            }
        };

        let body = json!({
            "error": {
                "message": message,
                "code": status.as_u16(),
                "kind": kind,
            }
        });

        (status, Json(body)).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use subline_core::error::CoreError;
use subline_core::srt::SrtError;
use subline_pipeline::PipelineError;
use subline_store::StoreError;

/// Application-level error type for HTTP handlers.
///
/// Wraps the domain errors of every crate and adds HTTP-specific variants.
/// Implements [`IntoResponse`] to produce consistent JSON error responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `subline_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// The uploaded file failed strict parsing.
    #[error(transparent)]
    Srt(#[from] SrtError),

    #[error(transparent)]
    Store(#[from] StoreError),

    /// A translation job aborted.
    #[error(transparent)]
    Pipeline(#[from] PipelineError),

    /// A bad request with a human-readable message.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// An internal error with a human-readable message.
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

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
                CoreError::Validation(msg) => {
                    (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
                }
            },

            AppError::Srt(err) => (StatusCode::BAD_REQUEST, "MALFORMED_ENTRY", err.to_string()),

            // --- Storage and pipeline errors ---
            AppError::Store(err) => classify_store_error(err),
            AppError::Pipeline(PipelineError::Store(err)) => classify_store_error(err),
            AppError::Pipeline(err @ PipelineError::Translation { .. }) => {
                tracing::warn!(error = %err, "Translation job failed");
                (StatusCode::BAD_GATEWAY, "TRANSLATION_FAILED", err.to_string())
            }

            // --- HTTP-specific errors ---
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
            AppError::InternalError(msg) => internal(msg),
        };

        let body = json!({
            "error": message,
            "code": code,
        });

        (status, axum::Json(body)).into_response()
    }
}

/// Log the detail, return a sanitized 500.
fn internal(detail: &str) -> (StatusCode, &'static str, String) {
    tracing::error!(error = %detail, "Internal error");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        "INTERNAL_ERROR",
        "An internal error occurred".to_string(),
    )
}

fn classify_store_error(err: &StoreError) -> (StatusCode, &'static str, String) {
    match err {
        StoreError::SetNotFound(id) => (
            StatusCode::NOT_FOUND,
            "NOT_FOUND",
            format!("SubtitleSet with id {id} not found"),
        ),
        // Entries are only addressed internally, so a missing one is our bug.
        StoreError::EntryNotFound(_) => internal(&err.to_string()),
    }
}

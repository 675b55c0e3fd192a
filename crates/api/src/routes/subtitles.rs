//! Route definitions for the subtitle translation flow.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::{progress, subtitles};
use crate::state::AppState;

/// Subtitle routes, merged directly under `/api/v1`.
///
/// ```text
/// POST   /upload                          -> upload
/// POST   /translate/{set_id}              -> translate
/// GET    /translation-progress/{set_id}   -> stream_progress
/// GET    /download/{set_id}               -> download
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/upload", post(subtitles::upload))
        .route("/translate/{set_id}", post(subtitles::translate))
        .route(
            "/translation-progress/{set_id}",
            get(progress::stream_progress),
        )
        .route("/download/{set_id}", get(subtitles::download))
}

pub mod health;
pub mod subtitles;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /upload                                  upload an SRT file (POST, multipart)
/// /translate/{set_id}                      run the translation job (POST)
/// /translation-progress/{set_id}           progress stream (GET, SSE)
/// /download/{set_id}                       translated SRT file (GET)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new().merge(subtitles::router())
}

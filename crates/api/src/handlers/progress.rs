//! Server-Sent Events stream of translation progress.

use axum::extract::{Path, State};
use axum::response::sse::{Event, KeepAlive, Sse};
use futures::{Stream, StreamExt};
use subline_core::error::CoreError;
use subline_core::types::DbId;

use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// GET /api/v1/translation-progress/{set_id}
///
/// Register a listener for the set's job and stream each progress event as
/// one JSON `data:` message. The stream ends after the terminal event; a
/// client that disconnects earlier drops its listener without affecting the
/// job. Clients open a new stream per job.
pub async fn stream_progress(
    State(state): State<AppState>,
    Path(set_id): Path<DbId>,
) -> AppResult<Sse<impl Stream<Item = Result<Event, axum::Error>>>> {
    if state.store.find_set(set_id).await?.is_none() {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "SubtitleSet",
            id: set_id,
        }));
    }

    let subscription = state.progress.subscribe(set_id);
    tracing::debug!(
        set_id,
        subscription_id = subscription.id(),
        "Progress stream opened"
    );

    let events = subscription
        .into_stream()
        .map(|event| Event::default().json_data(&event));

    Ok(Sse::new(events).keep_alive(KeepAlive::default()))
}

use std::sync::Arc;

use subline_events::ProgressChannel;
use subline_pipeline::TranslationPipeline;
use subline_store::SharedStore;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheaply cloneable; everything inside is behind `Arc`.
#[derive(Clone)]
pub struct AppState {
    /// Subtitle sets and entries.
    pub store: SharedStore,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Progress register shared by the pipeline and the SSE handler.
    pub progress: Arc<ProgressChannel>,
    /// Translation job runner.
    pub pipeline: TranslationPipeline,
}

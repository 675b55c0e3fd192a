use std::net::SocketAddr;
use std::sync::Arc;

use subline_events::ProgressChannel;
use subline_pipeline::{PipelineConfig, TranslationPipeline};
use subline_store::{MemoryStore, SharedStore};
use subline_translate::{AwsTranslator, MockTranslator, SharedTranslator};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use subline_api::config::{ServerConfig, TranslationProvider};
use subline_api::router::build_app_router;
use subline_api::state::AppState;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "subline_api=debug,subline_pipeline=debug,subline_events=info,tower_http=debug"
                    .into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = ServerConfig::from_env();
    tracing::info!(
        host = %config.host,
        port = %config.port,
        provider = ?config.provider,
        target_language = %config.target_language,
        batch_size = config.batch_size,
        "Loaded server configuration"
    );

    // --- Storage ---
    let store: SharedStore = Arc::new(MemoryStore::new());
    tracing::info!("In-memory subtitle store created");

    // --- Translation provider ---
    let translator: SharedTranslator = match config.provider {
        TranslationProvider::Aws => Arc::new(AwsTranslator::from_env().await),
        TranslationProvider::Mock => {
            tracing::warn!("Using mock translation provider");
            Arc::new(MockTranslator::new())
        }
    };

    // --- Progress channel ---
    let progress = Arc::new(ProgressChannel::new());
    tracing::info!("Progress channel created");

    // --- Pipeline ---
    let pipeline = TranslationPipeline::new(
        Arc::clone(&store),
        translator,
        Arc::clone(&progress),
        PipelineConfig::new(config.batch_size),
    );

    // --- App state ---
    let state = AppState {
        store,
        config: Arc::new(config.clone()),
        progress: Arc::clone(&progress),
        pipeline,
    };

    let app = build_app_router(state, &config);

    // --- Start server ---
    let addr = SocketAddr::new(
        config.host.parse().expect("Invalid HOST address"),
        config.port,
    );
    tracing::info!(%addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(Arc::clone(&progress)))
        .await
        .expect("Server error");

    tracing::info!("Graceful shutdown complete");
}

/// Wait for a termination signal to initiate graceful shutdown.
///
/// Handles both SIGINT (Ctrl-C) and SIGTERM (on Unix). Open progress
/// streams are closed so their connections can drain.
async fn shutdown_signal(progress: Arc<ProgressChannel>) {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }

    progress.close_all();
}

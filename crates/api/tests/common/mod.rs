#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::header::CONTENT_TYPE;
use axum::http::{Method, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use subline_api::config::{ServerConfig, TranslationProvider};
use subline_api::router::build_app_router;
use subline_api::state::AppState;
use subline_events::ProgressChannel;
use subline_pipeline::{PipelineConfig, TranslationPipeline};
use subline_store::{MemoryStore, SharedStore};
use subline_translate::{MockTranslator, SharedTranslator};
use tower::ServiceExt;

const BOUNDARY: &str = "subline-test-boundary";

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        request_timeout_secs: 30,
        upload_limit_bytes: 1024 * 1024,
        target_language: "es".to_string(),
        batch_size: 10,
        provider: TranslationProvider::Mock,
    }
}

/// Build the full application router around an in-memory store and the
/// given translator, using the same middleware stack as production.
pub fn build_test_app(translator: MockTranslator) -> Router {
    let config = test_config();
    let store: SharedStore = Arc::new(MemoryStore::new());
    let translator: SharedTranslator = Arc::new(translator);
    let progress = Arc::new(ProgressChannel::new());
    let pipeline = TranslationPipeline::new(
        Arc::clone(&store),
        translator,
        Arc::clone(&progress),
        PipelineConfig::new(config.batch_size),
    );

    let state = AppState {
        store,
        config: Arc::new(config.clone()),
        progress,
        pipeline,
    };

    build_app_router(state, &config)
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    let request = Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn post_empty(app: Router, uri: &str) -> Response<Body> {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

/// POST a single file part named `field`.
pub async fn post_multipart(
    app: Router,
    uri: &str,
    field: &str,
    filename: &str,
    content: &str,
) -> Response<Body> {
    let body = format!(
        "--{BOUNDARY}\r\n\
         Content-Disposition: form-data; name=\"{field}\"; filename=\"{filename}\"\r\n\
         Content-Type: application/x-subrip\r\n\
         \r\n\
         {content}\r\n\
         --{BOUNDARY}--\r\n"
    );
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(
            CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

/// Upload `content` as `episode.srt` and return the new set id.
pub async fn upload_srt(app: Router, content: &str) -> i64 {
    let response = post_multipart(app, "/api/v1/upload", "srt", "episode.srt", content).await;
    let json = body_json(response).await;
    json["data"]["set_id"].as_i64().unwrap()
}

/// Render `n` well-formed SRT blocks with texts `line 1` .. `line n`.
pub fn srt_fixture(n: usize) -> String {
    (1..=n)
        .map(|i| format!("{i}\n00:00:{i:02},000 --> 00:00:{i:02},900\nline {i}\n"))
        .collect::<Vec<_>>()
        .join("\n")
}

pub async fn body_bytes(response: Response<Body>) -> Vec<u8> {
    response
        .into_body()
        .collect()
        .await
        .unwrap()
        .to_bytes()
        .to_vec()
}

pub async fn body_text(response: Response<Body>) -> String {
    String::from_utf8(body_bytes(response).await).unwrap()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}

#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use tower::ServiceExt;

use pige_api::config::ServerConfig;
use pige_api::router::build_app_router;
use pige_api::settings::SettingsStore;
use pige_api::state::AppState;
use pige_api::store::ResultStore;

/// Build a test `ServerConfig` with safe defaults.
///
/// Uses `http://localhost:5173` as CORS origin (matching the dev default),
/// a 30-second request timeout and a 5-second proxy timeout. Settings are
/// kept in memory.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        proxy_timeout_secs: 5,
        result_retention_secs: 3600,
        result_store_max_entries: 100,
        callback_max_body_bytes: pige_api::config::DEFAULT_CALLBACK_MAX_BODY_BYTES,
        settings_path: None,
    }
}

/// Build fresh state for `config`.
pub fn test_state(config: &ServerConfig) -> AppState {
    AppState {
        config: Arc::new(config.clone()),
        results: Arc::new(ResultStore::new(
            Duration::from_secs(config.result_retention_secs),
            config.result_store_max_entries,
        )),
        settings: Arc::new(SettingsStore::in_memory()),
        http: reqwest::Client::new(),
    }
}

/// Build the full application router with all middleware layers.
///
/// Goes through the same `build_app_router` as `main.rs` so integration
/// tests exercise the production middleware stack.
pub fn build_test_app() -> Router {
    let config = test_config();
    build_app_router(test_state(&config), &config)
}

/// Same as [`build_test_app`] but also returns the state for inspection.
pub fn build_test_app_with_state() -> (Router, AppState) {
    let config = test_config();
    let state = test_state(&config);
    (build_app_router(state.clone(), &config), state)
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn send_json(
    app: Router,
    method: &str,
    uri: &str,
    body: &serde_json::Value,
) -> Response<Body> {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn post_json(app: Router, uri: &str, body: &serde_json::Value) -> Response<Body> {
    send_json(app, "POST", uri, body).await
}

pub async fn put_json(app: Router, uri: &str, body: &serde_json::Value) -> Response<Body> {
    send_json(app, "PUT", uri, body).await
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

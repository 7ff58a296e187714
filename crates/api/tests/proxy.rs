//! Integration tests for the forwarding hop.
//!
//! A throwaway axum server on an ephemeral port stands in for the
//! automation engine.

mod common;

use axum::body::{Body, Bytes};
use axum::http::{HeaderMap, Method, Request, StatusCode};
use axum::routing::post;
use axum::{Json, Router};
use common::body_json;
use http_body_util::BodyExt;
use serde_json::json;
use tower::ServiceExt;

/// Start a fake engine that echoes the received body and content type.
async fn spawn_fake_engine() -> String {
    async fn echo(headers: HeaderMap, body: Bytes) -> Json<serde_json::Value> {
        let received: serde_json::Value = serde_json::from_slice(&body).unwrap_or_default();
        Json(json!({
            "recherche_id": "engine-42",
            "echo": received,
            "contentType": headers
                .get("content-type")
                .and_then(|v| v.to_str().ok())
                .unwrap_or_default(),
        }))
    }

    async fn reject() -> (StatusCode, &'static str) {
        (StatusCode::SERVICE_UNAVAILABLE, "engine overloaded")
    }

    let app = Router::new()
        .route("/webhook/pige", post(echo))
        .route("/webhook/down", post(reject));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    format!("http://{addr}")
}

fn proxy_request(target: Option<&str>, body: serde_json::Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method(Method::POST)
        .uri("/n8n-proxy")
        .header("content-type", "application/json");
    if let Some(target) = target {
        builder = builder.header("X-N8N-Webhook-Url", target);
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

// ---------------------------------------------------------------------------
// Test: Missing target header returns 400
// ---------------------------------------------------------------------------

#[tokio::test]
async fn missing_header_returns_400() {
    let response = common::build_test_app()
        .oneshot(proxy_request(None, json!({})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "BAD_REQUEST");
    assert_eq!(json["error"], "X-N8N-Webhook-Url header is missing");
}

// ---------------------------------------------------------------------------
// Test: Non-http target is rejected
// ---------------------------------------------------------------------------

#[tokio::test]
async fn non_http_target_returns_400() {
    let response = common::build_test_app()
        .oneshot(proxy_request(Some("file:///etc/passwd"), json!({})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// ---------------------------------------------------------------------------
// Test: Body is relayed unchanged and the upstream response comes back
// ---------------------------------------------------------------------------

#[tokio::test]
async fn relays_body_and_upstream_response() {
    let engine = spawn_fake_engine().await;
    let payload = json!({ "location": "Toulouse", "radiusKm": 5, "essential": [] });

    let response = common::build_test_app()
        .oneshot(proxy_request(
            Some(format!("{engine}/webhook/pige").as_str()),
            payload.clone(),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get("content-type").unwrap(),
        "application/json"
    );

    let json = body_json(response).await;
    assert_eq!(json["recherche_id"], "engine-42");
    assert_eq!(json["echo"], payload);
    assert_eq!(json["contentType"], "application/json");
}

// ---------------------------------------------------------------------------
// Test: Upstream error status and body are relayed as-is
// ---------------------------------------------------------------------------

#[tokio::test]
async fn relays_upstream_error_status() {
    let engine = spawn_fake_engine().await;

    let response = common::build_test_app()
        .oneshot(proxy_request(Some(format!("{engine}/webhook/down").as_str()), json!({})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    assert_eq!(&bytes[..], b"engine overloaded");
}

// ---------------------------------------------------------------------------
// Test: Unreachable upstream returns 502 BAD_GATEWAY
// ---------------------------------------------------------------------------

#[tokio::test]
async fn unreachable_upstream_returns_502() {
    // Bind then drop to get a port nothing listens on.
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let response = common::build_test_app()
        .oneshot(proxy_request(Some(format!("http://{addr}/webhook").as_str()), json!({})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    assert_eq!(body_json(response).await["code"], "BAD_GATEWAY");
}

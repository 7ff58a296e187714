//! Same-origin forwarding hop to the external automation engine.
//!
//! The browser never calls the operator-supplied engine URL directly: it
//! posts here with the target in a header, and the body is relayed
//! unchanged. The upstream status, body and content type are relayed back.

use axum::body::Bytes;
use axum::extract::State;
use axum::http::header::CONTENT_TYPE;
use axum::http::{HeaderMap, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use pige_core::settings::normalize_webhook_url;

use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// Header naming the upstream engine URL.
pub const WEBHOOK_URL_HEADER: &str = "x-n8n-webhook-url";

/// POST /n8n-proxy
///
/// Forward the request body to the URL named in `X-N8N-Webhook-Url`.
pub async fn forward_to_engine(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> AppResult<Response> {
    let raw_target = headers
        .get(WEBHOOK_URL_HEADER)
        .ok_or_else(|| AppError::BadRequest("X-N8N-Webhook-Url header is missing".into()))?
        .to_str()
        .map_err(|_| AppError::BadRequest("X-N8N-Webhook-Url header is not valid text".into()))?;

    let target = normalize_webhook_url(Some(raw_target))?
        .ok_or_else(|| AppError::BadRequest("X-N8N-Webhook-Url header is empty".into()))?;

    let content_type = headers
        .get(CONTENT_TYPE)
        .cloned()
        .unwrap_or_else(|| HeaderValue::from_static("application/json"));

    tracing::info!(target = %target, bytes = body.len(), "Forwarding search to engine");

    let upstream = state
        .http
        .post(&target)
        .header(CONTENT_TYPE, content_type)
        .timeout(state.config.proxy_timeout())
        .body(body)
        .send()
        .await
        .map_err(|e| AppError::BadGateway(format!("Failed to reach engine at {target}: {e}")))?;

    let status =
        StatusCode::from_u16(upstream.status().as_u16()).unwrap_or(StatusCode::BAD_GATEWAY);
    let upstream_type = upstream.headers().get(CONTENT_TYPE).cloned();
    let bytes = upstream
        .bytes()
        .await
        .map_err(|e| AppError::BadGateway(format!("Failed to read engine response: {e}")))?;

    tracing::info!(target = %target, status = status.as_u16(), "Engine responded");

    let mut response = (status, bytes).into_response();
    if let Some(content_type) = upstream_type {
        response.headers_mut().insert(CONTENT_TYPE, content_type);
    }
    Ok(response)
}

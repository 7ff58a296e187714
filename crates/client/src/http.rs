//! HTTP backend talking to `pige-api`.
//!
//! Wraps the forwarding hop, the polling endpoint and the engine settings
//! endpoint using [`reqwest`].

use async_trait::async_trait;
use pige_core::payload::SearchPayload;
use pige_core::result::StoredResult;
use pige_core::settings::EngineSettings;
use reqwest::{StatusCode, Url};
use serde::Deserialize;

use crate::backend::{EngineReply, SearchBackend};
use crate::error::BackendError;

/// Header naming the engine URL on the forwarding hop.
const WEBHOOK_URL_HEADER: &str = "X-N8N-Webhook-Url";

/// Error code the forwarding hop uses when the engine is unreachable.
const BAD_GATEWAY_CODE: &str = "BAD_GATEWAY";

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
    code: String,
}

#[derive(Debug, Deserialize)]
struct DataBody<T> {
    data: T,
}

/// HTTP client for a single `pige-api` server.
pub struct HttpBackend {
    client: reqwest::Client,
    base_url: Url,
}

impl HttpBackend {
    /// * `base_url` - Server origin, e.g. `http://localhost:9002`.
    pub fn new(base_url: &str) -> Result<Self, BackendError> {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    /// Create a backend reusing an existing [`reqwest::Client`].
    pub fn with_client(client: reqwest::Client, base_url: &str) -> Result<Self, BackendError> {
        let base_url =
            Url::parse(base_url).map_err(|e| BackendError::InvalidUrl(format!("{base_url}: {e}")))?;
        if base_url.cannot_be_a_base() {
            return Err(BackendError::InvalidUrl(base_url.to_string()));
        }
        Ok(Self { client, base_url })
    }

    /// Fetch the operator-configured engine webhook URL, if any.
    pub async fn engine_url(&self) -> Result<Option<String>, BackendError> {
        let response = self
            .client
            .get(self.endpoint(&["api", "settings", "engine"])?)
            .send()
            .await?;
        let body: DataBody<EngineSettings> = Self::ensure_success(response).await?.json().await?;
        Ok(body.data.webhook_url().map(str::to_string))
    }

    // ---- private helpers ----

    /// Join path segments onto the base URL, percent-encoding each one.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, BackendError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| BackendError::InvalidUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn ensure_success(
        response: reqwest::Response,
    ) -> Result<reqwest::Response, BackendError> {
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(BackendError::Status {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }
}

#[async_trait]
impl SearchBackend for HttpBackend {
    async fn forward(
        &self,
        engine_url: &str,
        payload: &SearchPayload,
    ) -> Result<EngineReply, BackendError> {
        let response = self
            .client
            .post(self.endpoint(&["n8n-proxy"])?)
            .header(WEBHOOK_URL_HEADER, engine_url)
            .json(payload)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        // The hop's own 502 means the engine was never reached.
        if status == StatusCode::BAD_GATEWAY {
            if let Ok(err) = serde_json::from_str::<ErrorBody>(&body) {
                if err.code == BAD_GATEWAY_CODE {
                    return Err(BackendError::Unreachable(err.error));
                }
            }
        }

        Ok(EngineReply {
            status: status.as_u16(),
            body,
        })
    }

    async fn fetch_result(&self, search_id: &str) -> Result<Option<StoredResult>, BackendError> {
        let response = self
            .client
            .get(self.endpoint(&["api", "pige-results", search_id])?)
            .send()
            .await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }

        let stored = Self::ensure_success(response).await?.json().await?;
        Ok(Some(stored))
    }
}

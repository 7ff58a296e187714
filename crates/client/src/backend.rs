//! Seam between the coordinator and the server it talks to.

use async_trait::async_trait;
use pige_core::payload::SearchPayload;
use pige_core::result::StoredResult;

use crate::error::BackendError;

/// Synchronous reply of the engine, as relayed by the forwarding hop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineReply {
    pub status: u16,
    pub body: String,
}

impl EngineReply {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Transport used by [`crate::SearchCoordinator`].
///
/// [`crate::http::HttpBackend`] is the production implementation; tests
/// plug in fakes.
#[async_trait]
pub trait SearchBackend: Send + Sync + 'static {
    /// Post `payload` to the engine at `engine_url` via the forwarding hop.
    ///
    /// Any status the engine answers with is an `Ok`; only failing to reach
    /// it is an `Err`.
    async fn forward(
        &self,
        engine_url: &str,
        payload: &SearchPayload,
    ) -> Result<EngineReply, BackendError>;

    /// Look up the callback result for `search_id`. `Ok(None)` means the
    /// engine has not called back yet.
    async fn fetch_result(&self, search_id: &str) -> Result<Option<StoredResult>, BackendError>;
}

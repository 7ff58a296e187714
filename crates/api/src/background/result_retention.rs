//! Periodic purge of expired callback results.
//!
//! Spawns a background task that drops entries from the [`ResultStore`]
//! older than its retention period. Runs on a fixed interval using
//! `tokio::time::interval`.

use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use crate::store::ResultStore;

/// How often the purge job runs.
pub const PURGE_INTERVAL: Duration = Duration::from_secs(300); // 5 minutes

/// Run the result retention loop until `cancel` is triggered.
pub async fn run(store: Arc<ResultStore>, interval: Duration, cancel: CancellationToken) {
    tracing::info!(
        retention_secs = store.retention().as_secs(),
        interval_secs = interval.as_secs(),
        "Result retention job started"
    );

    let mut ticker = tokio::time::interval(interval);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!("Result retention job stopping");
                break;
            }
            _ = ticker.tick() => {
                let purged = store.purge_expired().await;
                if purged > 0 {
                    tracing::info!(purged, "Result retention: purged expired results");
                } else {
                    tracing::debug!("Result retention: nothing to purge");
                }
            }
        }
    }
}

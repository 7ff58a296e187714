//! Bounded polling of the correlation store.
//!
//! One [`Poller`] runs per session in `polling`. Each tick performs one
//! lookup. A hit completes the session; a miss or a failed lookup keeps
//! the loop going. Only the ceiling or the [`CancellationToken`] stop it.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use pige_core::session::{SearchSession, DEFAULT_POLL_CEILING, DEFAULT_POLL_INTERVAL};
use tokio::sync::watch;
use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use crate::backend::SearchBackend;

/// Tunable polling parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollSettings {
    /// Delay between two lookups. The first lookup happens one interval in.
    pub interval: Duration,
    /// Time from submission after which the session times out.
    pub ceiling: Duration,
}

impl Default for PollSettings {
    fn default() -> Self {
        Self {
            interval: DEFAULT_POLL_INTERVAL,
            ceiling: DEFAULT_POLL_CEILING,
        }
    }
}

/// Counts running pollers. Decrements on drop, so an aborted task still
/// releases its slot.
pub(crate) struct PollerGuard(Arc<AtomicUsize>);

impl PollerGuard {
    pub(crate) fn acquire(counter: &Arc<AtomicUsize>) -> Self {
        counter.fetch_add(1, Ordering::SeqCst);
        Self(Arc::clone(counter))
    }
}

impl Drop for PollerGuard {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

pub(crate) struct Poller {
    pub backend: Arc<dyn SearchBackend>,
    pub search_id: String,
    pub session: Arc<watch::Sender<SearchSession>>,
    pub interval: Duration,
    /// Wall-clock deadline, fixed at submission time.
    pub deadline: Instant,
    pub cancel: CancellationToken,
    pub guard: PollerGuard,
}

impl Poller {
    /// Poll until the session leaves `polling`.
    pub async fn run(self) {
        let Poller {
            backend,
            search_id,
            session,
            interval,
            deadline,
            cancel,
            guard: _guard,
        } = self;

        tracing::info!(
            search_id = %search_id,
            interval_secs = interval.as_secs(),
            "Polling for pige result",
        );

        let mut ticker = tokio::time::interval_at(Instant::now() + interval, interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        let ceiling = tokio::time::sleep_until(deadline);
        tokio::pin!(ceiling);

        let mut attempt = 0u32;

        loop {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    tracing::info!(search_id = %search_id, "Polling cancelled");
                    break;
                }
                _ = &mut ceiling => {
                    time_out(&session, &search_id);
                    break;
                }
                _ = ticker.tick() => {}
            }

            attempt += 1;

            // An in-flight lookup does not delay cancellation or the ceiling.
            let fetched = tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    tracing::info!(search_id = %search_id, "Polling cancelled");
                    break;
                }
                _ = &mut ceiling => {
                    time_out(&session, &search_id);
                    break;
                }
                fetched = backend.fetch_result(&search_id) => fetched,
            };

            match fetched {
                Ok(Some(result)) => {
                    if session.send_if_modified(|s| s.complete(result).is_ok()) {
                        tracing::info!(search_id = %search_id, attempt, "Pige result received");
                    } else {
                        tracing::debug!(
                            search_id = %search_id,
                            "Result arrived after the session ended, discarding",
                        );
                    }
                    break;
                }
                Ok(None) => {
                    tracing::debug!(search_id = %search_id, attempt, "Result not yet available");
                }
                Err(e) => {
                    tracing::warn!(
                        search_id = %search_id,
                        attempt,
                        error = %e,
                        "Poll attempt failed, will retry",
                    );
                }
            }
        }
    }
}

fn time_out(session: &watch::Sender<SearchSession>, search_id: &str) {
    if session.send_if_modified(|s| s.time_out().is_ok()) {
        tracing::warn!(search_id = %search_id, "Pige search timed out");
    }
}

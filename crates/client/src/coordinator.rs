//! Search submission and session ownership.
//!
//! The coordinator owns at most one active search. Starting a new one
//! cancels the previous session and waits for its poller to exit before
//! submitting, so no two pollers ever run for the same operator.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use pige_core::board::CriteriaBoard;
use pige_core::payload::SearchPayload;
use pige_core::result::extract_search_id;
use pige_core::session::SearchSession;
use tokio::sync::{watch, Mutex};
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use crate::backend::SearchBackend;
use crate::error::SubmitError;
use crate::poller::{PollSettings, Poller, PollerGuard};

/// How long to wait for a cancelled poller to exit before aborting it.
const POLLER_STOP_GRACE: Duration = Duration::from_secs(5);

/// Shared handles to one session: its state channel and cancellation token.
#[derive(Debug, Clone)]
struct SessionControl {
    session: Arc<watch::Sender<SearchSession>>,
    cancel: CancellationToken,
}

impl SessionControl {
    fn new() -> Self {
        let (tx, _rx) = watch::channel(SearchSession::new());
        Self {
            session: Arc::new(tx),
            cancel: CancellationToken::new(),
        }
    }

    fn is(&self, other: &SessionControl) -> bool {
        Arc::ptr_eq(&self.session, &other.session)
    }

    /// Move the session to `cancelled` and stop its poller. Returns `false`
    /// if the session was already terminal.
    fn cancel(&self) -> bool {
        let cancelled = self.session.send_if_modified(SearchSession::cancel);
        self.cancel.cancel();
        cancelled
    }

    fn handle(&self) -> SearchHandle {
        SearchHandle {
            session: self.session.subscribe(),
            control: self.clone(),
        }
    }
}

/// Caller-side view of one search.
#[derive(Debug, Clone)]
pub struct SearchHandle {
    session: watch::Receiver<SearchSession>,
    control: SessionControl,
}

impl SearchHandle {
    /// Current snapshot of the session.
    pub fn session(&self) -> SearchSession {
        self.session.borrow().clone()
    }

    /// Wait until the session reaches a terminal state and return it.
    pub async fn wait(&self) -> SearchSession {
        let mut rx = self.session.clone();
        if let Ok(session) = rx.wait_for(SearchSession::is_terminal).await {
            return session.clone();
        }
        let session = rx.borrow().clone();
        session
    }

    /// Cancel this search. No-op (returns `false`) once it is terminal.
    pub fn cancel(&self) -> bool {
        let cancelled = self.control.cancel();
        if cancelled {
            tracing::info!(
                search_id = ?self.control.session.borrow().search_id,
                "Pige search cancelled",
            );
        }
        cancelled
    }
}

struct ActiveSearch {
    control: SessionControl,
    poller: Option<JoinHandle<()>>,
}

impl ActiveSearch {
    /// Cancel the session and wait for its poller to exit.
    async fn stop(self) {
        self.control.cancel();
        if let Some(mut poller) = self.poller {
            if tokio::time::timeout(POLLER_STOP_GRACE, &mut poller)
                .await
                .is_err()
            {
                tracing::warn!("Poller did not stop in time, aborting");
                poller.abort();
            }
        }
    }
}

/// Submits searches and owns the single active session.
pub struct SearchCoordinator {
    backend: Arc<dyn SearchBackend>,
    callback_url: String,
    poll: PollSettings,
    current: Mutex<Option<ActiveSearch>>,
    pollers: Arc<AtomicUsize>,
}

impl SearchCoordinator {
    /// * `callback_url` - Absolute URL of this system's callback receiver,
    ///   embedded in every payload.
    pub fn new(backend: Arc<dyn SearchBackend>, callback_url: String, poll: PollSettings) -> Self {
        Self {
            backend,
            callback_url,
            poll,
            current: Mutex::new(None),
            pollers: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Submit a new search built from `board`.
    ///
    /// Any previous session is cancelled first. On success the returned
    /// handle's session is `polling` (or `cancelled` if the operator
    /// cancelled during submission). On failure the session is `failed`
    /// with [`SubmitError::user_message`] as its error.
    pub async fn start_search(
        &self,
        engine_url: Option<&str>,
        board: &CriteriaBoard,
        location: &str,
        radius_km: u32,
    ) -> Result<SearchHandle, SubmitError> {
        let control = SessionControl::new();
        let previous = self.current.lock().await.replace(ActiveSearch {
            control: control.clone(),
            poller: None,
        });
        if let Some(previous) = previous {
            previous.stop().await;
        }

        let started = Instant::now();
        control
            .session
            .send_if_modified(|s| s.begin_submit(Utc::now()).is_ok());

        let Some(engine_url) = engine_url.map(str::trim).filter(|u| !u.is_empty()) else {
            return Err(fail(&control, SubmitError::NotConfigured));
        };

        let payload = SearchPayload::build(board, location, radius_km, &self.callback_url);
        tracing::info!(
            location = %payload.location,
            radius_km,
            essential = payload.essential.len(),
            important = payload.important.len(),
            bonus = payload.bonus.len(),
            "Submitting pige search",
        );

        let forwarded = tokio::select! {
            biased;
            _ = control.cancel.cancelled() => return Ok(control.handle()),
            forwarded = self.backend.forward(engine_url, &payload) => forwarded,
        };

        let reply = match forwarded {
            Ok(reply) => reply,
            Err(e) => return Err(fail(&control, SubmitError::Transport(e.to_string()))),
        };
        if !reply.is_success() {
            return Err(fail(
                &control,
                SubmitError::Engine {
                    status: reply.status,
                    body: reply.body,
                },
            ));
        }
        let search_id = parse_search_id(&reply.body).map_err(|e| fail(&control, e))?;

        if !control
            .session
            .send_if_modified(|s| s.start_polling(search_id.clone()).is_ok())
        {
            tracing::info!(search_id = %search_id, "Search cancelled during submission");
            return Ok(control.handle());
        }
        tracing::info!(search_id = %search_id, "Pige search accepted by engine");

        let mut current = self.current.lock().await;
        match current.as_mut() {
            Some(active) if active.control.is(&control) && !control.cancel.is_cancelled() => {
                let poller = Poller {
                    backend: Arc::clone(&self.backend),
                    search_id,
                    session: Arc::clone(&control.session),
                    interval: self.poll.interval,
                    deadline: started + self.poll.ceiling,
                    cancel: control.cancel.clone(),
                    guard: PollerGuard::acquire(&self.pollers),
                };
                active.poller = Some(tokio::spawn(poller.run()));
            }
            // Superseded by a newer search or cancelled while we waited.
            _ => {
                control.cancel();
            }
        }

        Ok(control.handle())
    }

    /// Snapshot of the active session, if any.
    pub async fn current_session(&self) -> Option<SearchSession> {
        self.current
            .lock()
            .await
            .as_ref()
            .map(|active| active.control.session.borrow().clone())
    }

    /// Cancel and forget the active session. Returns `false` if there was
    /// none or it had already ended.
    pub async fn cancel_active(&self) -> bool {
        let active = self.current.lock().await.take();
        match active {
            Some(active) => {
                let was_terminal = active.control.session.borrow().is_terminal();
                active.stop().await;
                !was_terminal
            }
            None => false,
        }
    }

    /// Number of poller tasks still running.
    pub fn active_poller_count(&self) -> usize {
        self.pollers.load(Ordering::SeqCst)
    }
}

impl Drop for SearchCoordinator {
    fn drop(&mut self) {
        if let Some(active) = self.current.get_mut().take() {
            active.control.cancel();
        }
    }
}

/// Mark the session failed and hand the error back to the caller.
fn fail(control: &SessionControl, err: SubmitError) -> SubmitError {
    control
        .session
        .send_if_modified(|s| s.fail(err.user_message()).is_ok());
    tracing::warn!(error = %err, "Pige search submission failed");
    err
}

/// Pull the correlation id out of the engine's synchronous reply.
fn parse_search_id(body: &str) -> Result<String, SubmitError> {
    let value: serde_json::Value = serde_json::from_str(body)
        .map_err(|e| SubmitError::MalformedResponse(format!("response is not valid JSON: {e}")))?;
    extract_search_id(&value).ok_or_else(|| {
        SubmitError::MalformedResponse("response does not contain a recherche_id".into())
    })
}

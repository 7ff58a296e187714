//! Search session state machine.
//!
//! ```text
//! idle --submit--> submitting --searchId--> polling --entry found--> completed
//!                  submitting --error-----> failed
//!                                           polling --ceiling------> timedOut
//!      (any non-terminal) --cancel--> cancelled
//! ```
//!
//! `completed`, `failed`, `timedOut` and `cancelled` are terminal. A
//! session is single-use.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::result::StoredResult;
use crate::types::Timestamp;

/// Interval between two polls of the correlation store.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(30);

/// Hard ceiling on how long a search may stay in `polling`.
pub const DEFAULT_POLL_CEILING: Duration = Duration::from_secs(15 * 60);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SessionStatus {
    Idle,
    Submitting,
    Polling,
    Completed,
    Cancelled,
    Failed,
    TimedOut,
}

impl SessionStatus {
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            Self::Completed | Self::Cancelled | Self::Failed | Self::TimedOut
        )
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Submitting => "submitting",
            Self::Polling => "polling",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
            Self::Failed => "failed",
            Self::TimedOut => "timedOut",
        }
    }
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Message shown to the operator when the ceiling is reached.
pub const TIMED_OUT_MESSAGE: &str = "The search took longer than 15 minutes and was stopped.";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchSession {
    pub search_id: Option<String>,
    pub status: SessionStatus,
    pub result: Option<StoredResult>,
    /// Operator-facing message for `failed` and `timedOut`.
    pub error: Option<String>,
    pub submitted_at: Option<Timestamp>,
}

impl Default for SearchSession {
    fn default() -> Self {
        Self::new()
    }
}

impl SearchSession {
    pub fn new() -> Self {
        Self {
            search_id: None,
            status: SessionStatus::Idle,
            result: None,
            error: None,
            submitted_at: None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }

    fn expect(&self, expected: SessionStatus, action: &'static str) -> Result<(), CoreError> {
        if self.status == expected {
            Ok(())
        } else {
            Err(CoreError::InvalidTransition {
                from: self.status,
                action,
            })
        }
    }

    pub fn begin_submit(&mut self, now: Timestamp) -> Result<(), CoreError> {
        self.expect(SessionStatus::Idle, "submit")?;
        self.status = SessionStatus::Submitting;
        self.submitted_at = Some(now);
        Ok(())
    }

    pub fn start_polling(&mut self, search_id: String) -> Result<(), CoreError> {
        self.expect(SessionStatus::Submitting, "start polling")?;
        self.search_id = Some(search_id);
        self.status = SessionStatus::Polling;
        Ok(())
    }

    pub fn fail(&mut self, message: String) -> Result<(), CoreError> {
        self.expect(SessionStatus::Submitting, "fail")?;
        self.status = SessionStatus::Failed;
        self.error = Some(message);
        Ok(())
    }

    pub fn complete(&mut self, result: StoredResult) -> Result<(), CoreError> {
        self.expect(SessionStatus::Polling, "complete")?;
        self.status = SessionStatus::Completed;
        self.result = Some(result);
        Ok(())
    }

    pub fn time_out(&mut self) -> Result<(), CoreError> {
        self.expect(SessionStatus::Polling, "time out")?;
        self.status = SessionStatus::TimedOut;
        self.error = Some(TIMED_OUT_MESSAGE.to_string());
        Ok(())
    }

    /// Cancel the session. Returns `false` if it was already terminal.
    pub fn cancel(&mut self) -> bool {
        if self.is_terminal() {
            return false;
        }
        self.status = SessionStatus::Cancelled;
        true
    }
}

use std::time::Duration;

use pige_core::payload::callback_url;

use crate::poller::PollSettings;

/// Client configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of `pige-api`.
    pub server_url: String,
    /// Origin the engine uses to reach the callback receiver.
    pub public_url: String,
    pub poll_interval_secs: u64,
    pub poll_timeout_secs: u64,
}

impl ClientConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                   | Default                 |
    /// |---------------------------|-------------------------|
    /// | `PIGE_SERVER_URL`         | `http://localhost:9002` |
    /// | `PIGE_PUBLIC_URL`         | `PIGE_SERVER_URL`       |
    /// | `PIGE_POLL_INTERVAL_SECS` | `30`                    |
    /// | `PIGE_POLL_TIMEOUT_SECS`  | `900`                   |
    pub fn from_env() -> Self {
        let server_url =
            std::env::var("PIGE_SERVER_URL").unwrap_or_else(|_| "http://localhost:9002".into());

        let public_url = std::env::var("PIGE_PUBLIC_URL")
            .ok()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| server_url.clone());

        let poll_interval_secs: u64 = std::env::var("PIGE_POLL_INTERVAL_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("PIGE_POLL_INTERVAL_SECS must be a valid u64");

        let poll_timeout_secs: u64 = std::env::var("PIGE_POLL_TIMEOUT_SECS")
            .unwrap_or_else(|_| "900".into())
            .parse()
            .expect("PIGE_POLL_TIMEOUT_SECS must be a valid u64");

        Self {
            server_url,
            public_url,
            poll_interval_secs,
            poll_timeout_secs,
        }
    }

    pub fn poll_settings(&self) -> PollSettings {
        PollSettings {
            interval: Duration::from_secs(self.poll_interval_secs.max(1)),
            ceiling: Duration::from_secs(self.poll_timeout_secs),
        }
    }

    /// Callback URL embedded in every submitted payload.
    pub fn callback_url(&self) -> String {
        callback_url(&self.public_url)
    }
}

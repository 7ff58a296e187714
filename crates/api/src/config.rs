use std::path::PathBuf;
use std::time::Duration;

/// Default callback body limit. Engine results with thousands of listings
/// easily exceed axum's 2 MB default.
pub const DEFAULT_CALLBACK_MAX_BODY_BYTES: usize = 64 * 1024 * 1024;

/// Server configuration loaded from environment variables.
///
/// All fields have sensible defaults suitable for local development.
/// In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `9002`).
    pub port: u16,
    /// Allowed CORS origins for same-origin routes, parsed from comma-separated
    /// `CORS_ORIGINS`. The callback receiver ignores this and allows any origin.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `150`). Must exceed the proxy timeout.
    pub request_timeout_secs: u64,
    /// Upstream timeout for the forwarding hop in seconds (default: `120`).
    pub proxy_timeout_secs: u64,
    /// How long callback results are kept, in seconds (default: one day).
    pub result_retention_secs: u64,
    /// Upper bound on stored callback results (default: `1000`).
    pub result_store_max_entries: usize,
    /// Largest callback body accepted from the engine, in bytes (default: 64 MiB).
    pub callback_max_body_bytes: usize,
    /// Where operator settings are persisted. `None` keeps them in memory only.
    pub settings_path: Option<PathBuf>,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                    | Default                 |
    /// |----------------------------|-------------------------|
    /// | `HOST`                     | `0.0.0.0`               |
    /// | `PORT`                     | `9002`                  |
    /// | `CORS_ORIGINS`             | `http://localhost:5173` |
    /// | `REQUEST_TIMEOUT_SECS`     | `150`                   |
    /// | `PROXY_TIMEOUT_SECS`       | `120`                   |
    /// | `RESULT_RETENTION_SECS`    | `86400`                 |
    /// | `RESULT_STORE_MAX_ENTRIES` | `1000`                  |
    /// | `CALLBACK_MAX_BODY_BYTES`  | `67108864`              |
    /// | `SETTINGS_PATH`            | `pige-settings.json`    |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "9002".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "150".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let proxy_timeout_secs: u64 = std::env::var("PROXY_TIMEOUT_SECS")
            .unwrap_or_else(|_| "120".into())
            .parse()
            .expect("PROXY_TIMEOUT_SECS must be a valid u64");

        let result_retention_secs: u64 = std::env::var("RESULT_RETENTION_SECS")
            .unwrap_or_else(|_| "86400".into())
            .parse()
            .expect("RESULT_RETENTION_SECS must be a valid u64");

        let result_store_max_entries: usize = std::env::var("RESULT_STORE_MAX_ENTRIES")
            .unwrap_or_else(|_| "1000".into())
            .parse()
            .expect("RESULT_STORE_MAX_ENTRIES must be a valid usize");

        let callback_max_body_bytes: usize = std::env::var("CALLBACK_MAX_BODY_BYTES")
            .unwrap_or_else(|_| DEFAULT_CALLBACK_MAX_BODY_BYTES.to_string())
            .parse()
            .expect("CALLBACK_MAX_BODY_BYTES must be a valid usize");

        let settings_path = std::env::var("SETTINGS_PATH")
            .unwrap_or_else(|_| "pige-settings.json".into());
        let settings_path =
            (!settings_path.trim().is_empty()).then(|| PathBuf::from(settings_path));

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            proxy_timeout_secs,
            result_retention_secs,
            result_store_max_entries,
            callback_max_body_bytes,
            settings_path,
        }
    }

    pub fn proxy_timeout(&self) -> Duration {
        Duration::from_secs(self.proxy_timeout_secs)
    }

    pub fn result_retention(&self) -> Duration {
        Duration::from_secs(self.result_retention_secs)
    }
}

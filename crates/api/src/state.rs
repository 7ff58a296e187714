use std::sync::Arc;

use crate::config::ServerConfig;
use crate::settings::SettingsStore;
use crate::store::ResultStore;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Callback results keyed by search id.
    pub results: Arc<ResultStore>,
    /// Operator settings (engine webhook URL).
    pub settings: Arc<SettingsStore>,
    /// Outbound client used by the forwarding hop.
    pub http: reqwest::Client,
}

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use pige_api::background::result_retention;
use pige_api::config::ServerConfig;
use pige_api::router::build_app_router;
use pige_api::settings::SettingsStore;
use pige_api::state::AppState;
use pige_api::store::ResultStore;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "pige_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = ServerConfig::from_env();
    tracing::info!(host = %config.host, port = %config.port, "Loaded server configuration");

    // --- Operator settings ---
    let settings = match &config.settings_path {
        Some(path) => SettingsStore::load(path)
            .await
            .expect("Failed to load operator settings"),
        None => SettingsStore::in_memory(),
    };
    let configured = settings.get().await.webhook_url().is_some();
    tracing::info!(configured, "Operator settings loaded");

    // --- Correlation store ---
    let results = Arc::new(ResultStore::new(
        config.result_retention(),
        config.result_store_max_entries,
    ));

    let retention_cancel = CancellationToken::new();
    let retention_handle = tokio::spawn(result_retention::run(
        Arc::clone(&results),
        result_retention::PURGE_INTERVAL,
        retention_cancel.clone(),
    ));

    // --- HTTP client for the forwarding hop ---
    let http = reqwest::Client::builder()
        .build()
        .expect("Failed to build reqwest HTTP client");

    // --- App state ---
    let state = AppState {
        config: Arc::new(config.clone()),
        results,
        settings: Arc::new(settings),
        http,
    };

    let app = build_app_router(state, &config);

    // --- Start server ---
    let addr = SocketAddr::new(
        config.host.parse().expect("Invalid HOST address"),
        config.port,
    );
    tracing::info!(%addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    // --- Post-shutdown cleanup ---
    tracing::info!("Server stopped accepting connections, cleaning up");

    retention_cancel.cancel();
    let _ = tokio::time::timeout(Duration::from_secs(5), retention_handle).await;
    tracing::info!("Result retention job stopped");

    tracing::info!("Graceful shutdown complete");
}

/// Wait for a termination signal to initiate graceful shutdown.
///
/// Handles both SIGINT (Ctrl-C) and SIGTERM (on Unix).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}

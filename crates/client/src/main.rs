//! `pige-search` -- run one pige search from a saved search profile.
//!
//! Derives a criteria board from a `SearchProfile` JSON file, submits it to
//! the automation engine configured on the `pige-api` server, and waits for
//! the result. Ctrl-C cancels the search.
//!
//! ```text
//! pige-search <profile.json>
//! ```
//!
//! See [`pige_client::config::ClientConfig::from_env`] for environment
//! variables.

use std::sync::Arc;

use pige_core::catalog;
use pige_core::deriver::{self, DEFAULT_RADIUS_KM};
use pige_core::profile::SearchProfile;
use pige_core::report::SearchReport;
use pige_core::session::SessionStatus;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use pige_client::config::ClientConfig;
use pige_client::http::HttpBackend;
use pige_client::SearchCoordinator;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "pige_client=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let profile_path = std::env::args().nth(1).unwrap_or_else(|| {
        eprintln!("usage: pige-search <profile.json>");
        std::process::exit(2);
    });

    let config = ClientConfig::from_env();

    let raw = tokio::fs::read(&profile_path).await.unwrap_or_else(|e| {
        tracing::error!(path = %profile_path, error = %e, "Failed to read profile");
        std::process::exit(1);
    });
    let profile: SearchProfile = serde_json::from_slice(&raw).unwrap_or_else(|e| {
        tracing::error!(path = %profile_path, error = %e, "Invalid search profile");
        std::process::exit(1);
    });

    let derived = deriver::derive(&profile, catalog::predefined());
    let location = derived.location.clone().unwrap_or_default();
    let radius_km = derived.radius_km.unwrap_or(DEFAULT_RADIUS_KM);

    tracing::info!(
        server_url = %config.server_url,
        location = %location,
        radius_km,
        "Starting pige-search",
    );

    let backend = HttpBackend::new(&config.server_url).unwrap_or_else(|e| {
        tracing::error!(error = %e, "Invalid PIGE_SERVER_URL");
        std::process::exit(1);
    });
    let engine_url = backend.engine_url().await.unwrap_or_else(|e| {
        tracing::error!(error = %e, "Failed to read engine settings");
        std::process::exit(1);
    });

    let coordinator = SearchCoordinator::new(
        Arc::new(backend),
        config.callback_url(),
        config.poll_settings(),
    );

    let handle = match coordinator
        .start_search(engine_url.as_deref(), &derived.board, &location, radius_km)
        .await
    {
        Ok(handle) => handle,
        Err(e) => {
            eprintln!("{}", e.user_message());
            std::process::exit(1);
        }
    };

    let session = tokio::select! {
        session = handle.wait() => session,
        _ = tokio::signal::ctrl_c() => {
            handle.cancel();
            handle.session()
        }
    };

    match serde_json::to_string_pretty(&session) {
        Ok(json) => println!("{json}"),
        Err(e) => tracing::error!(error = %e, "Failed to encode session"),
    }

    match (&session.status, &session.result) {
        (SessionStatus::Completed, Some(result)) => {
            let report = SearchReport::from_payload(&result.payload);
            eprintln!(
                "{} listings ({} agencies scanned, {} duplicates removed)",
                report.listings.len(),
                report.stats.agencies_scanned,
                report.stats.duplicates_removed,
            );
            for listing in report.listings.iter().take(10) {
                eprintln!(
                    "  {:>3.0}%  {:>10.0} EUR  {}  {}",
                    listing.score, listing.price, listing.title, listing.url
                );
            }
        }
        (status, _) => {
            if let Some(error) = &session.error {
                eprintln!("Search {status}: {error}");
            } else {
                eprintln!("Search {status}");
            }
            std::process::exit(1);
        }
    }
}

//! Full round trip over real HTTP: coordinator -> pige-api forwarding hop ->
//! fake engine -> callback receiver -> poller.

use std::sync::Arc;
use std::time::Duration;

use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use pige_api::config::ServerConfig;
use pige_api::router::build_app_router;
use pige_api::settings::SettingsStore;
use pige_api::state::AppState;
use pige_api::store::ResultStore;
use pige_client::http::HttpBackend;
use pige_client::{PollSettings, SearchBackend, SearchCoordinator, SubmitError};
use pige_core::board::{Column, CriteriaBoard};
use pige_core::criterion::{NumberRange, ValueUpdate};
use pige_core::payload::callback_url;
use pige_core::report::SearchReport;
use pige_core::session::SessionStatus;
use serde_json::{json, Value};

fn server_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        proxy_timeout_secs: 5,
        result_retention_secs: 3600,
        result_store_max_entries: 100,
        callback_max_body_bytes: pige_api::config::DEFAULT_CALLBACK_MAX_BODY_BYTES,
        settings_path: None,
    }
}

/// Start `pige-api` on an ephemeral port. Returns its origin and state.
async fn spawn_server() -> (String, AppState) {
    let config = server_config();
    let state = AppState {
        config: Arc::new(config.clone()),
        results: Arc::new(ResultStore::new(Duration::from_secs(3600), 100)),
        settings: Arc::new(SettingsStore::in_memory()),
        http: reqwest::Client::new(),
    };
    let app = build_app_router(state.clone(), &config);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (format!("http://{addr}"), state)
}

/// Fake engine: accepts the search, answers with `abc123`, and calls back
/// shortly after with a result for it.
async fn spawn_engine(received: Arc<tokio::sync::Mutex<Option<Value>>>) -> String {
    async fn trigger(
        State(received): State<Arc<tokio::sync::Mutex<Option<Value>>>>,
        Json(payload): Json<Value>,
    ) -> Json<Value> {
        *received.lock().await = Some(payload.clone());

        let callback = payload["callbackUrl"].as_str().unwrap_or_default().to_string();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(150)).await;
            let _ = reqwest::Client::new()
                .post(callback)
                .json(&json!({
                    "payload": {
                        "recherche_id": "abc123",
                        "stats": { "agences_scrapees": 3 },
                        "annonces": [
                            { "titre": "Maison T4", "prix": 320000, "score_compatibilite": 88 }
                        ]
                    }
                }))
                .send()
                .await;
        });

        Json(json!({ "recherche_id": "abc123" }))
    }

    let app = Router::new()
        .route("/webhook/pige", post(trigger))
        .with_state(received);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    format!("http://{addr}/webhook/pige")
}

fn fast_polling() -> PollSettings {
    PollSettings {
        interval: Duration::from_millis(50),
        ceiling: Duration::from_secs(10),
    }
}

// ---------------------------------------------------------------------------
// Test: Submit, receive callback, complete
// ---------------------------------------------------------------------------

#[tokio::test]
async fn search_round_trip_completes_with_callback_payload() {
    let (server, state) = spawn_server().await;
    let received = Arc::new(tokio::sync::Mutex::new(None));
    let engine = spawn_engine(Arc::clone(&received)).await;

    state.settings.set_webhook_url(Some(engine.as_str())).await.unwrap();

    let backend = HttpBackend::new(&server).unwrap();
    let engine_url = backend.engine_url().await.unwrap();
    assert_eq!(engine_url.as_deref(), Some(engine.as_str()));

    let mut board = CriteriaBoard::fresh();
    board.move_criterion("budget", Column::Available, Column::Essential);
    board
        .update_value(
            "budget",
            ValueUpdate::Range(NumberRange::between(300000.0, 350000.0)),
        )
        .unwrap();

    let coordinator =
        SearchCoordinator::new(Arc::new(backend), callback_url(&server), fast_polling());
    let handle = coordinator
        .start_search(engine_url.as_deref(), &board, "Toulouse", 5)
        .await
        .unwrap();
    assert_eq!(handle.session().status, SessionStatus::Polling);
    assert_eq!(handle.session().search_id.as_deref(), Some("abc123"));

    let session = tokio::time::timeout(Duration::from_secs(5), handle.wait())
        .await
        .expect("search should complete");
    assert_eq!(session.status, SessionStatus::Completed);

    // The engine saw the serialized board.
    let sent = received.lock().await.clone().unwrap();
    assert_eq!(sent["location"], "Toulouse");
    assert_eq!(sent["radiusKm"], 5);
    assert_eq!(sent["essential"][0]["label"], "Budget (€)");
    assert_eq!(sent["essential"][0]["value"], json!({ "min": 300000, "max": 350000 }));
    assert_eq!(sent["callbackUrl"], format!("{server}/api/pige-results"));

    // The caller sees exactly what the engine called back with.
    let result = session.result.unwrap();
    assert_eq!(result.search_id, "abc123");
    assert_eq!(result.payload["payload"]["recherche_id"], "abc123");

    let report = SearchReport::from_payload(&result.payload);
    assert_eq!(report.stats.agencies_scanned, 3);
    assert_eq!(report.listings[0].title, "Maison T4");
}

// ---------------------------------------------------------------------------
// Test: Unreachable engine surfaces as a transport error
// ---------------------------------------------------------------------------

#[tokio::test]
async fn unreachable_engine_is_a_transport_error() {
    let (server, _state) = spawn_server().await;

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let dead = format!("http://{}/webhook", listener.local_addr().unwrap());
    drop(listener);

    let backend = HttpBackend::new(&server).unwrap();
    let coordinator =
        SearchCoordinator::new(Arc::new(backend), callback_url(&server), fast_polling());

    let err = coordinator
        .start_search(Some(dead.as_str()), &CriteriaBoard::fresh(), "Toulouse", 5)
        .await
        .unwrap_err();

    match err {
        SubmitError::Transport(msg) => assert!(msg.contains("Failed to reach engine")),
        other => panic!("expected transport error, got {other:?}"),
    }
    assert_eq!(
        coordinator.current_session().await.unwrap().status,
        SessionStatus::Failed
    );
}

// ---------------------------------------------------------------------------
// Test: Polling endpoint answers None until a callback lands
// ---------------------------------------------------------------------------

#[tokio::test]
async fn fetch_result_is_none_until_callback() {
    let (server, state) = spawn_server().await;
    let backend = HttpBackend::new(&server).unwrap();

    assert!(backend.fetch_result("later").await.unwrap().is_none());

    state
        .results
        .insert("later".into(), json!({ "recherche_id": "later" }))
        .await;

    let stored = backend.fetch_result("later").await.unwrap().unwrap();
    assert_eq!(stored.search_id, "later");
}

// ---------------------------------------------------------------------------
// Test: Unset engine settings read back as None
// ---------------------------------------------------------------------------

#[tokio::test]
async fn engine_url_is_none_until_configured() {
    let (server, _state) = spawn_server().await;
    let backend = HttpBackend::new(&server).unwrap();
    assert_eq!(backend.engine_url().await.unwrap(), None);
}

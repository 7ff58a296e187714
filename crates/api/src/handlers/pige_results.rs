//! Callback receiver and polling endpoint for engine results.

use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use pige_core::result::{extract_search_id, StoredResult};

use crate::error::{AppError, AppResult};
use crate::response::CallbackAck;
use crate::state::AppState;

/// POST /api/pige-results
///
/// Store an engine callback keyed by its embedded search id. Always
/// acknowledges: a body without a usable id is logged and dropped.
pub async fn receive_result(State(state): State<AppState>, body: Bytes) -> Json<CallbackAck> {
    let ack = Json(CallbackAck { received: true });

    let payload: serde_json::Value = match serde_json::from_slice(&body) {
        Ok(value) => value,
        Err(e) => {
            tracing::warn!(error = %e, bytes = body.len(), "Pige callback body is not valid JSON");
            return ack;
        }
    };

    match extract_search_id(&payload) {
        Some(search_id) => {
            state.results.insert(search_id.clone(), payload).await;
            tracing::info!(search_id = %search_id, "Pige result received");
        }
        None => {
            tracing::warn!("Pige callback without recherche_id, ignoring");
        }
    }

    ack
}

/// OPTIONS /api/pige-results
///
/// Plain OPTIONS requests that are not CORS pre-flights still succeed.
pub async fn preflight() -> StatusCode {
    StatusCode::NO_CONTENT
}

/// GET /api/pige-results/{search_id}
///
/// Return the stored result, or 404 while the engine is still working.
pub async fn get_result(
    State(state): State<AppState>,
    Path(search_id): Path<String>,
) -> AppResult<Json<StoredResult>> {
    state
        .results
        .get(&search_id)
        .await
        .map(Json)
        .ok_or(AppError::NotYetAvailable(search_id))
}

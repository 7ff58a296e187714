//! Operator settings handlers.

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateEngineSettings {
    #[serde(default)]
    pub webhook_url: Option<String>,
}

/// GET /api/settings/engine
pub async fn get_engine_settings(State(state): State<AppState>) -> impl IntoResponse {
    Json(DataResponse {
        data: state.settings.get().await,
    })
}

/// PUT /api/settings/engine
///
/// Set or clear the automation engine webhook URL.
pub async fn update_engine_settings(
    State(state): State<AppState>,
    Json(input): Json<UpdateEngineSettings>,
) -> AppResult<impl IntoResponse> {
    let updated = state
        .settings
        .set_webhook_url(input.webhook_url.as_deref())
        .await?;

    tracing::info!(configured = updated.webhook_url().is_some(), "Engine settings updated");

    Ok(Json(DataResponse { data: updated }))
}

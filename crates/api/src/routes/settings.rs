use axum::routing::get;
use axum::Router;

use crate::handlers::settings;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route(
        "/api/settings/engine",
        get(settings::get_engine_settings).put(settings::update_engine_settings),
    )
}

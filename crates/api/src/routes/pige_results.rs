use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;

use crate::handlers::pige_results;
use crate::state::AppState;

/// Public callback route. Gets the permissive CORS layer and its own body
/// limit of `max_body_bytes`.
pub fn callback_router(max_body_bytes: usize) -> Router<AppState> {
    Router::new()
        .route(
            "/api/pige-results",
            post(pige_results::receive_result).options(pige_results::preflight),
        )
        .layer(DefaultBodyLimit::max(max_body_bytes))
}

/// Same-origin polling route.
pub fn polling_router() -> Router<AppState> {
    Router::new().route("/api/pige-results/{search_id}", get(pige_results::get_result))
}

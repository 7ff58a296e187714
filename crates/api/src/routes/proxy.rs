use axum::routing::post;
use axum::Router;

use crate::handlers::proxy;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/n8n-proxy", post(proxy::forward_to_engine))
}

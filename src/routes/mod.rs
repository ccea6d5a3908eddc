use axum::routing::{get, post};
use axum::Router;

use crate::controllers::{analysis_controller, system_controller};
use crate::shared_state::SharedState;

/// Assembles the full router (spec §6 HTTP Transport).
pub fn api_routes(state: SharedState) -> Router {
    Router::new()
        .route("/api/v1/analyze", post(analysis_controller::analyze))
        .route("/health", get(system_controller::health))
        .route("/metrics", get(system_controller::metrics))
        .with_state(state)
}

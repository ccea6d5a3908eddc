use axum::extract::State;
use axum::http::header;
use axum::Json;
use serde::Serialize;

use crate::models::verdict::ALGORITHM_VERSION;
use crate::shared_state::SharedState;

#[derive(Serialize, utoipa::ToSchema)]
pub struct HealthStatus {
    pub status: &'static str,
    pub algorithm_version: &'static str,
}

/// `GET /health` — liveness probe, no dependency checks (spec §6).
#[utoipa::path(get, path = "/health", responses((status = 200, body = HealthStatus)))]
pub async fn health() -> Json<HealthStatus> {
    Json(HealthStatus {
        status: "ok",
        algorithm_version: ALGORITHM_VERSION,
    })
}

/// `GET /metrics` — Prometheus text exposition (spec §6): request counters,
/// provider fallback counts and the calibrator's current cell count.
#[utoipa::path(get, path = "/metrics", responses((status = 200, body = String)))]
pub async fn metrics(State(state): State<SharedState>) -> impl axum::response::IntoResponse {
    let body = state.orchestrator.metrics_snapshot().await;
    (
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4; charset=utf-8")],
        body,
    )
}

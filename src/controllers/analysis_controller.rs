use axum::extract::State;
use axum::Json;

use crate::error::AppError;
use crate::models::query::Query;
use crate::models::wire::{AnalysisRequest, AnalysisResponse};
use crate::shared_state::SharedState;

/// `POST /api/v1/analyze` (spec §6). Runs the full pipeline and returns the
/// combined verdict/financial/features response.
#[utoipa::path(
    post,
    path = "/api/v1/analyze",
    request_body = AnalysisRequest,
    responses(
        (status = 200, description = "Site analyzed successfully", body = AnalysisResponse),
        (status = 400, description = "Input invalid", body = crate::error::ErrorBody),
        (status = 504, description = "Request deadline exceeded", body = crate::error::ErrorBody),
    )
)]
pub async fn analyze(
    State(state): State<SharedState>,
    Json(request): Json<AnalysisRequest>,
) -> Result<Json<AnalysisResponse>, AppError> {
    let query: Query = request.into();
    let response = state.orchestrator.analyze(query).await?;
    Ok(Json(response))
}

use utoipa::OpenApi;

use crate::controllers::{analysis_controller, system_controller};
use crate::error::ErrorBody;
use crate::models::{features, financial, query, verdict, wire};

#[derive(OpenApi)]
#[openapi(
    paths(
        analysis_controller::analyze,
        system_controller::health,
        system_controller::metrics,
    ),
    components(
        schemas(
            wire::AnalysisRequest,
            wire::AnalysisResponse,
            query::Query,
            features::Features,
            features::Provenance,
            financial::Financial,
            verdict::Verdict,
            verdict::Grade,
            verdict::SuitabilityClass,
            system_controller::HealthStatus,
            ErrorBody,
        )
    ),
    tags(
        (name = "solar-site-analyzer", description = "PV site suitability analysis API")
    )
)]
pub struct ApiDoc;

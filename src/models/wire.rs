use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::features::Features;
use super::financial::Financial;
use super::query::Query;
use super::verdict::Verdict;

/// `POST /api/v1/analyze` request body (spec §6).
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct AnalysisRequest {
    pub lat: f64,
    pub lng: f64,
    pub plant_size_kw: f64,
    pub electricity_rate: f64,
    #[serde(default)]
    pub panel_area: Option<f64>,
    #[serde(default)]
    pub efficiency: Option<f64>,
    #[serde(default)]
    pub installation_cost: Option<f64>,
    #[serde(default)]
    pub grid_distance_km: Option<f64>,
    #[serde(default)]
    pub available_area_m2: Option<f64>,
}

impl From<AnalysisRequest> for Query {
    fn from(r: AnalysisRequest) -> Self {
        Query {
            lat: r.lat,
            lng: r.lng,
            plant_size_kw: r.plant_size_kw,
            electricity_rate: r.electricity_rate,
            available_area_m2: r.available_area_m2,
            installation_cost: r.installation_cost,
            grid_distance_km: r.grid_distance_km,
            panel_area: r.panel_area,
            efficiency: r.efficiency,
        }
    }
}

/// `POST /api/v1/analyze` response body (spec §6): Verdict + Financial +
/// echoed Features + narrative metadata.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct AnalysisResponse {
    #[serde(flatten)]
    pub verdict: Verdict,
    #[serde(flatten)]
    pub financial: Financial,
    pub features: Features,
    pub ai_summary: String,
    pub ai_provider: String,
}

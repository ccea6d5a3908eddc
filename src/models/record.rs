use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::verdict::{Grade, SuitabilityClass};

/// Persisted analysis outcome (spec §3 `AnalysisRecord`). Created exactly
/// once per successful pipeline run; never mutated.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AnalysisRecord {
    /// Assigned by the history store on insert; `0` before insertion.
    pub id: i64,
    pub created_at: DateTime<Utc>,
    pub lat: f64,
    pub lng: f64,
    pub solar_irradiance: f64,
    pub cloud_cover_pct: f64,
    pub slope_degrees: f64,
    pub grid_distance_km: f64,
    pub score: i32,
    pub grade: Grade,
    pub suitability_class: SuitabilityClass,
    pub confidence: i32,
    pub annual_energy_kwh: f64,
    pub payback_years: f64,
    pub lifetime_profit: f64,
    pub ai_summary: String,
    pub ai_provider: String,
}

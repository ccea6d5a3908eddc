use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Provenance of a single acquired feature, tracked only to compute
/// `data_sources` (spec §3).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Provenance {
    Live,
    Climatology,
    RegionalEstimate,
}

/// Fully-assembled site features, one value per external signal (spec §3).
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Features {
    pub solar_irradiance: f64,
    pub wind_speed: f64,
    pub temperature_c: f64,
    pub humidity_pct: f64,
    pub cloud_cover_pct: f64,
    pub elevation_m: f64,
    pub slope_degrees: f64,
    pub grid_distance_km: f64,
    /// Count of {0,1,2,3,4} providers that returned live (non-fallback) data.
    pub data_sources: u8,
}

impl Features {
    /// §4.2 plausibility check: counts impossible inputs.
    pub fn impossible_input_count(&self) -> u32 {
        let mut n = 0;
        if self.solar_irradiance > 10.0 || self.solar_irradiance < 0.0 {
            n += 1;
        }
        if self.slope_degrees < 0.0 {
            n += 1;
        }
        if !(0.0..=100.0).contains(&self.cloud_cover_pct) {
            n += 1;
        }
        if !(0.0..=90.0).contains(&self.slope_degrees) {
            n += 1;
        }
        n
    }
}

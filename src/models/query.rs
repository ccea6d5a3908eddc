use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::AppError;

/// Immutable analysis input (spec §3 `Query`).
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Query {
    pub lat: f64,
    pub lng: f64,
    pub plant_size_kw: f64,
    pub electricity_rate: f64,
    #[serde(default)]
    pub available_area_m2: Option<f64>,
    #[serde(default)]
    pub installation_cost: Option<f64>,
    #[serde(default)]
    pub grid_distance_km: Option<f64>,
    /// Legacy area-first sizing input (panel footprint, m²).
    #[serde(default)]
    pub panel_area: Option<f64>,
    /// Legacy area-first sizing input (panel conversion efficiency, 0..1).
    #[serde(default)]
    pub efficiency: Option<f64>,
}

impl Query {
    /// Boundary validation (spec §7 `InputInvalid`). Rejected inputs never
    /// reach the scoring/financial engines.
    pub fn validate(&self) -> Result<(), AppError> {
        if !(-90.0..=90.0).contains(&self.lat) {
            return Err(AppError::InputInvalid(format!(
                "lat {} out of range [-90, 90]",
                self.lat
            )));
        }
        if !(-180.0..=180.0).contains(&self.lng) {
            return Err(AppError::InputInvalid(format!(
                "lng {} out of range [-180, 180]",
                self.lng
            )));
        }
        if !(self.plant_size_kw > 0.0) || !self.plant_size_kw.is_finite() {
            return Err(AppError::InputInvalid(
                "plant_size_kw must be > 0".to_string(),
            ));
        }
        // Spec §3 types `electricity_rate` as `> 0`, but §8's boundary
        // behaviours require `electricity_rate = 0` to reach the financial
        // engine and yield `payback = infinity` rather than being rejected.
        // Resolved (see DESIGN.md): only negative/non-finite rates are
        // rejected at the boundary; zero is allowed through.
        if self.electricity_rate < 0.0 || !self.electricity_rate.is_finite() {
            return Err(AppError::InputInvalid(
                "electricity_rate must be >= 0".to_string(),
            ));
        }
        if let Some(area) = self.available_area_m2 {
            if area < 0.0 || !area.is_finite() {
                return Err(AppError::InputInvalid(
                    "available_area_m2 must be >= 0".to_string(),
                ));
            }
        }
        if let Some(grid) = self.grid_distance_km {
            if grid < 0.0 || !grid.is_finite() {
                return Err(AppError::InputInvalid(
                    "grid_distance_km must be >= 0".to_string(),
                ));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> Query {
        Query {
            lat: 26.92,
            lng: 70.90,
            plant_size_kw: 20.0,
            electricity_rate: 8.0,
            available_area_m2: Some(200.0),
            installation_cost: None,
            grid_distance_km: Some(8.0),
            panel_area: None,
            efficiency: None,
        }
    }

    #[test]
    fn valid_query_passes() {
        assert!(base().validate().is_ok());
    }

    #[test]
    fn zero_plant_size_is_invalid() {
        let mut q = base();
        q.plant_size_kw = 0.0;
        assert!(matches!(q.validate(), Err(AppError::InputInvalid(_))));
    }

    #[test]
    fn out_of_range_lat_is_invalid() {
        let mut q = base();
        q.lat = 95.0;
        assert!(matches!(q.validate(), Err(AppError::InputInvalid(_))));
    }

    #[test]
    fn zero_electricity_rate_passes_boundary_validation() {
        let mut q = base();
        q.electricity_rate = 0.0;
        assert!(q.validate().is_ok());
    }

    #[test]
    fn negative_electricity_rate_is_invalid() {
        let mut q = base();
        q.electricity_rate = -1.0;
        assert!(q.validate().is_err());
    }
}

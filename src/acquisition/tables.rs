//! Fallback tables (spec §4.1). These are the last resort in each
//! provider's priority chain — reached only when both the primary and any
//! secondary provider are unavailable.
//!
//! The latitude-band buckets below repackage the same climate-zone
//! reasoning the teacher's `solar_algorithm.rs` already uses for its
//! offline estimator (baseline cloudiness by latitude band, annual-mean
//! ambient temperature by latitude band, climatological wind speed by
//! latitude band) as flat lookup tables instead of a continuous model —
//! this spec's Non-goals rule out full PV-physics simulation, so only the
//! tabular fallback behavior survives the transform.

/// One row of the latitude-band climatology table.
struct LatBand {
    /// Upper bound of `|lat|` this row covers, in degrees.
    max_abs_lat: f64,
    solar_irradiance_kwh_m2_day: f64,
    wind_speed_m_s: f64,
    temperature_c: f64,
    humidity_pct: f64,
    cloud_cover_pct: f64,
}

/// Ordered by increasing `max_abs_lat`; the first row whose bound is `>=
/// |lat|` applies.
const LAT_BANDS: &[LatBand] = &[
    LatBand {
        max_abs_lat: 10.0,
        solar_irradiance_kwh_m2_day: 5.2,
        wind_speed_m_s: 2.2,
        temperature_c: 27.0,
        humidity_pct: 78.0,
        cloud_cover_pct: 55.0,
    },
    LatBand {
        max_abs_lat: 25.0,
        solar_irradiance_kwh_m2_day: 5.8,
        wind_speed_m_s: 3.0,
        temperature_c: 22.0,
        humidity_pct: 58.0,
        cloud_cover_pct: 40.0,
    },
    LatBand {
        max_abs_lat: 40.0,
        solar_irradiance_kwh_m2_day: 4.8,
        wind_speed_m_s: 3.8,
        temperature_c: 15.0,
        humidity_pct: 62.0,
        cloud_cover_pct: 50.0,
    },
    LatBand {
        max_abs_lat: 55.0,
        solar_irradiance_kwh_m2_day: 3.4,
        wind_speed_m_s: 4.5,
        temperature_c: 8.0,
        humidity_pct: 70.0,
        cloud_cover_pct: 62.0,
    },
    LatBand {
        max_abs_lat: 66.5,
        solar_irradiance_kwh_m2_day: 2.2,
        wind_speed_m_s: 5.5,
        temperature_c: 1.0,
        humidity_pct: 72.0,
        cloud_cover_pct: 68.0,
    },
    LatBand {
        max_abs_lat: 90.0,
        solar_irradiance_kwh_m2_day: 1.3,
        wind_speed_m_s: 6.5,
        temperature_c: -10.0,
        humidity_pct: 75.0,
        cloud_cover_pct: 72.0,
    },
];

fn band_for(lat_deg: f64) -> &'static LatBand {
    let abs_lat = lat_deg.abs();
    LAT_BANDS
        .iter()
        .find(|b| abs_lat <= b.max_abs_lat)
        .unwrap_or(&LAT_BANDS[LAT_BANDS.len() - 1])
}

pub fn fallback_solar_irradiance(lat_deg: f64) -> f64 {
    band_for(lat_deg).solar_irradiance_kwh_m2_day
}

pub struct WeatherFallback {
    pub wind_speed: f64,
    pub temperature_c: f64,
    pub humidity_pct: f64,
    pub cloud_cover_pct: f64,
}

pub fn fallback_weather(lat_deg: f64) -> WeatherFallback {
    let b = band_for(lat_deg);
    WeatherFallback {
        wind_speed: b.wind_speed_m_s,
        temperature_c: b.temperature_c,
        humidity_pct: b.humidity_pct,
        cloud_cover_pct: b.cloud_cover_pct,
    }
}

/// Regional elevation fallback (spec §4.1): a coarse table keyed by
/// continent bounding box, falling back further to a global default.
/// Slope defaults to 2 degrees in the fallback path, per spec.
pub fn fallback_elevation_m(lat_deg: f64, lng_deg: f64) -> f64 {
    // Himalaya/Tibetan plateau influence for the India box skews the mean
    // high; kept coarse on purpose, this is a last-resort estimate only.
    if (6.0..=36.0).contains(&lat_deg) && (68.0..=98.0).contains(&lng_deg) {
        350.0 // India
    } else if (35.0..=71.0).contains(&lat_deg) && (-25.0..=45.0).contains(&lng_deg) {
        300.0 // Europe
    } else if (15.0..=72.0).contains(&lat_deg) && (-170.0..=-50.0).contains(&lng_deg) {
        500.0 // North America
    } else if (-35.0..=37.0).contains(&lat_deg) && (-20.0..=52.0).contains(&lng_deg) {
        600.0 // Africa
    } else {
        400.0 // global default
    }
}

pub const FALLBACK_SLOPE_DEGREES: f64 = 2.0;

/// Deterministic grid-distance estimate (spec §4.1 "Grid-distance... from
/// a small region table"), used whenever the caller does not supply
/// `grid_distance_km` directly.
pub fn region_grid_distance_km(lat_deg: f64, lng_deg: f64) -> f64 {
    if (6.0..=36.0).contains(&lat_deg) && (68.0..=98.0).contains(&lng_deg) {
        12.0 // India: dense rural grid
    } else if (35.0..=71.0).contains(&lat_deg) && (-25.0..=45.0).contains(&lng_deg) {
        8.0 // Europe: dense grid
    } else if (15.0..=72.0).contains(&lat_deg) && (-170.0..=-50.0).contains(&lng_deg) {
        15.0 // North America
    } else if (-35.0..=37.0).contains(&lat_deg) && (-20.0..=52.0).contains(&lng_deg) {
        35.0 // Africa: sparser grid
    } else {
        25.0 // global default
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equatorial_band_is_high_irradiance() {
        assert!(fallback_solar_irradiance(2.0) > fallback_solar_irradiance(68.0));
    }

    #[test]
    fn polar_band_uses_last_row() {
        let v = fallback_solar_irradiance(89.0);
        assert_eq!(v, LAT_BANDS.last().unwrap().solar_irradiance_kwh_m2_day);
    }

    #[test]
    fn india_box_is_used_for_grid_distance() {
        assert_eq!(region_grid_distance_km(26.92, 70.90), 12.0);
    }

    #[test]
    fn outside_all_boxes_falls_back_to_global_default() {
        assert_eq!(region_grid_distance_km(-80.0, 0.0), 25.0);
    }
}

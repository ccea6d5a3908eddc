use serde::Deserialize;

use crate::models::features::Provenance;

use super::tables::{fallback_elevation_m, FALLBACK_SLOPE_DEGREES};

/// Offset (metres) from the center point used to build the five-point
/// cross for the slope estimate (spec §4.1).
const OFFSET_M: f64 = 200.0;
const METERS_PER_DEGREE_LAT: f64 = 111_320.0;

pub struct ElevationSlope {
    pub elevation_m: f64,
    pub slope_degrees: f64,
}

/// The five query points in the fixed order the spec requires:
/// `[center, north, south, east, west]`.
fn cross_points(lat: f64, lng: f64) -> [(f64, f64); 5] {
    let dlat = OFFSET_M / METERS_PER_DEGREE_LAT;
    let dlng = OFFSET_M / (METERS_PER_DEGREE_LAT * lat.to_radians().cos());
    [
        (lat, lng),
        (lat + dlat, lng),
        (lat - dlat, lng),
        (lat, lng + dlng),
        (lat, lng - dlng),
    ]
}

/// `slope_deg = atan(sqrt(dz_dx^2 + dz_dy^2)) * 180/pi` from the five
/// elevations `(c, n, s, e, w)` (spec §4.1).
fn slope_from_cross(c: f64, n: f64, s: f64, e: f64, w: f64) -> f64 {
    let _ = c;
    let dz_dx = (e - w) / (2.0 * OFFSET_M);
    let dz_dy = (n - s) / (2.0 * OFFSET_M);
    (dz_dx.hypot(dz_dy)).atan().to_degrees()
}

#[derive(Debug, Deserialize)]
struct OpenElevationResponse {
    results: Vec<OpenElevationResult>,
}

#[derive(Debug, Deserialize)]
struct OpenElevationResult {
    elevation: f64,
}

#[derive(Debug, Deserialize)]
struct OpenMeteoElevationResponse {
    elevation: Vec<f64>,
}

/// Priority chain per spec §4.1: primary batch provider (five-point
/// cross) → secondary batch provider → regional elevation table with a
/// fixed 2° slope default.
pub async fn fetch(client: &reqwest::Client, lat: f64, lng: f64) -> (ElevationSlope, Provenance) {
    let points = cross_points(lat, lng);

    if let Some(elevations) = fetch_primary(client, &points).await {
        return (build(&elevations), Provenance::Live);
    }
    if let Some(elevations) = fetch_secondary(client, &points).await {
        return (build(&elevations), Provenance::Live);
    }

    (
        ElevationSlope {
            elevation_m: fallback_elevation_m(lat, lng),
            slope_degrees: FALLBACK_SLOPE_DEGREES,
        },
        Provenance::RegionalEstimate,
    )
}

fn build(e: &[f64; 5]) -> ElevationSlope {
    let [c, n, s, e_, w] = *e;
    ElevationSlope {
        elevation_m: c,
        slope_degrees: slope_from_cross(c, n, s, e_, w),
    }
}

async fn fetch_primary(client: &reqwest::Client, points: &[(f64, f64); 5]) -> Option<[f64; 5]> {
    let locations = points
        .iter()
        .map(|(lat, lng)| format!("{lat},{lng}"))
        .collect::<Vec<_>>()
        .join("|");
    let url = format!("https://api.open-elevation.com/api/v1/lookup?locations={locations}");

    let resp = match client.get(&url).send().await {
        Ok(r) => r,
        Err(e) => {
            tracing::warn!(error = %e, "primary elevation provider failed, trying secondary");
            return None;
        }
    };
    let parsed = resp.json::<OpenElevationResponse>().await.ok()?;
    to_array(parsed.results.into_iter().map(|r| r.elevation).collect())
}

async fn fetch_secondary(client: &reqwest::Client, points: &[(f64, f64); 5]) -> Option<[f64; 5]> {
    let lats = points
        .iter()
        .map(|(lat, _)| lat.to_string())
        .collect::<Vec<_>>()
        .join(",");
    let lngs = points
        .iter()
        .map(|(_, lng)| lng.to_string())
        .collect::<Vec<_>>()
        .join(",");
    let url = format!("https://api.open-meteo.com/v1/elevation?latitude={lats}&longitude={lngs}");

    let resp = client.get(&url).send().await.ok()?;
    let parsed = resp.json::<OpenMeteoElevationResponse>().await.ok()?;
    to_array(parsed.elevation)
}

fn to_array(v: Vec<f64>) -> Option<[f64; 5]> {
    if v.len() != 5 {
        return None;
    }
    Some([v[0], v[1], v[2], v[3], v[4]])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flat_terrain_has_zero_slope() {
        let s = slope_from_cross(100.0, 100.0, 100.0, 100.0, 100.0);
        assert!((s - 0.0).abs() < 1e-9);
    }

    #[test]
    fn uniform_east_west_gradient_gives_positive_slope() {
        // 400m east-west rise of 40m over the 400m baseline -> dz_dx = 0.1
        let s = slope_from_cross(100.0, 100.0, 100.0, 120.0, 80.0);
        let expected = (0.1_f64).atan().to_degrees();
        assert!((s - expected).abs() < 1e-9);
    }

    #[test]
    fn cross_points_preserve_order() {
        let pts = cross_points(45.0, 7.0);
        // center first
        assert_eq!(pts[0], (45.0, 7.0));
        // north has greater latitude than center
        assert!(pts[1].0 > 45.0);
        // south has lesser latitude than center
        assert!(pts[2].0 < 45.0);
        // east has greater longitude
        assert!(pts[3].1 > 7.0);
        // west has lesser longitude
        assert!(pts[4].1 < 7.0);
    }
}

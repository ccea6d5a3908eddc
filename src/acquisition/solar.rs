use serde::Deserialize;

use crate::models::features::Provenance;

use super::tables::fallback_solar_irradiance;

/// Any value at or below this is a provider fill/sentinel, not real data
/// (spec §4.1, §6): "any value ≤ −900 is discarded".
pub fn is_fill_value(v: f64) -> bool {
    v <= -900.0
}

#[derive(Debug, Deserialize)]
struct DailyPointResponse {
    daily: DailyBlock,
}

#[derive(Debug, Deserialize)]
struct DailyBlock {
    #[serde(default)]
    shortwave_radiation_sum: Vec<Option<f64>>,
}

#[derive(Debug, Deserialize)]
struct ClimatologyResponse {
    #[serde(default)]
    annual_mean_kwh_m2_day: Option<f64>,
}

/// Priority chain per spec §4.1 §9: primary daily-point 365-day average →
/// climatology endpoint → latitude-band estimator. Never returns an
/// error; network failures degrade silently to the next attempt.
pub async fn fetch(client: &reqwest::Client, lat: f64, lng: f64) -> (f64, Provenance) {
    if let Some(v) = fetch_daily_point(client, lat, lng).await {
        return (v, Provenance::Live);
    }
    if let Some(v) = fetch_climatology(client, lat, lng).await {
        return (v, Provenance::Climatology);
    }
    (fallback_solar_irradiance(lat), Provenance::RegionalEstimate)
}

async fn fetch_daily_point(client: &reqwest::Client, lat: f64, lng: f64) -> Option<f64> {
    let url = format!(
        "https://archive-api.open-meteo.com/v1/archive?latitude={lat}&longitude={lng}\
         &daily=shortwave_radiation_sum&past_days=365&forecast_days=0&timezone=UTC"
    );
    let resp = match client.get(&url).send().await {
        Ok(r) => r,
        Err(e) => {
            tracing::warn!(error = %e, "solar daily-point fetch failed, trying climatology");
            return None;
        }
    };
    let parsed = match resp.json::<DailyPointResponse>().await {
        Ok(p) => p,
        Err(e) => {
            tracing::warn!(error = %e, "solar daily-point response unparseable");
            return None;
        }
    };

    let samples: Vec<f64> = parsed
        .daily
        .shortwave_radiation_sum
        .into_iter()
        .flatten()
        // W*s/m^2 daily sum -> kWh/m^2/day
        .map(|v| v / 3_600_000.0)
        .filter(|v| !is_fill_value(*v))
        .collect();

    if samples.is_empty() {
        return None;
    }
    Some(samples.iter().sum::<f64>() / samples.len() as f64)
}

async fn fetch_climatology(client: &reqwest::Client, lat: f64, lng: f64) -> Option<f64> {
    let url = format!(
        "https://climate-api.open-meteo.com/v1/climate?latitude={lat}&longitude={lng}\
         &metric=shortwave_radiation_sum"
    );
    let resp = client.get(&url).send().await.ok()?;
    let parsed = resp.json::<ClimatologyResponse>().await.ok()?;
    parsed
        .annual_mean_kwh_m2_day
        .filter(|v| !is_fill_value(*v))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fill_value_predicate() {
        assert!(is_fill_value(-900.0));
        assert!(is_fill_value(-999.0));
        assert!(!is_fill_value(-899.9));
        assert!(!is_fill_value(5.5));
    }
}

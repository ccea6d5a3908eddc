use serde::Deserialize;

use crate::models::features::Provenance;

use super::tables::fallback_weather;

#[derive(Debug, Deserialize)]
struct HourlyWeatherResponse {
    hourly: HourlyBlock,
}

#[derive(Debug, Deserialize)]
struct HourlyBlock {
    #[serde(default)]
    windspeed_10m: Vec<Option<f64>>,
    #[serde(default)]
    temperature_2m: Vec<Option<f64>>,
    #[serde(default)]
    relative_humidity_2m: Vec<Option<f64>>,
    #[serde(default)]
    cloudcover: Vec<Option<f64>>,
}

pub struct WeatherBundle {
    pub wind_speed: f64,
    pub temperature_c: f64,
    pub humidity_pct: f64,
    pub cloud_cover_pct: f64,
}

fn mean(values: &[Option<f64>]) -> Option<f64> {
    let present: Vec<f64> = values.iter().filter_map(|v| *v).collect();
    if present.is_empty() {
        None
    } else {
        Some(present.iter().sum::<f64>() / present.len() as f64)
    }
}

/// Single weather-bundle call; 7-day hourly mean of each of the four
/// fields (spec §4.1, §6). Falls back to the latitude-band table as a
/// whole — the spec treats the bundle as one provider, not four.
pub async fn fetch(client: &reqwest::Client, lat: f64, lng: f64) -> (WeatherBundle, Provenance) {
    match fetch_live(client, lat, lng).await {
        Some(bundle) => (bundle, Provenance::Live),
        None => {
            let fb = fallback_weather(lat);
            (
                WeatherBundle {
                    wind_speed: fb.wind_speed,
                    temperature_c: fb.temperature_c,
                    humidity_pct: fb.humidity_pct,
                    cloud_cover_pct: fb.cloud_cover_pct,
                },
                Provenance::RegionalEstimate,
            )
        }
    }
}

async fn fetch_live(client: &reqwest::Client, lat: f64, lng: f64) -> Option<WeatherBundle> {
    let url = format!(
        "https://archive-api.open-meteo.com/v1/archive?latitude={lat}&longitude={lng}\
         &hourly=windspeed_10m,temperature_2m,relative_humidity_2m,cloudcover\
         &past_days=7&forecast_days=0&timezone=UTC"
    );
    let resp = match client.get(&url).send().await {
        Ok(r) => r,
        Err(e) => {
            tracing::warn!(error = %e, "weather bundle fetch failed, using fallback table");
            return None;
        }
    };
    let parsed = match resp.json::<HourlyWeatherResponse>().await {
        Ok(p) => p,
        Err(e) => {
            tracing::warn!(error = %e, "weather bundle response unparseable");
            return None;
        }
    };

    let wind_speed = mean(&parsed.hourly.windspeed_10m)?;
    let temperature_c = mean(&parsed.hourly.temperature_2m)?;
    let humidity_pct = mean(&parsed.hourly.relative_humidity_2m)?;
    let cloud_cover_pct = mean(&parsed.hourly.cloudcover)?;

    Some(WeatherBundle {
        wind_speed,
        temperature_c,
        humidity_pct,
        cloud_cover_pct,
    })
}

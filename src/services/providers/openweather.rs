/// OpenWeatherMap forecast provider
///
/// Uses the 5 day / 3 hour forecast endpoint (`/data/2.5/forecast`), which
/// returns up to 40 slots. Responses are cached per rounded coordinates since
/// the forecast only changes every few hours.
use crate::{
    cached,
    db::{Cache, CacheKey},
    error::{AppError, AppResult},
    models::ForecastEntry,
    services::providers::ForecastProvider,
};
use chrono::NaiveDateTime;
use reqwest::Client as HttpClient;
use serde::Deserialize;
use std::time::Duration;

const FORECAST_PATH: &str = "/data/2.5/forecast";
const SLOT_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Deserialize)]
struct ApiForecastResponse {
    #[serde(default)]
    list: Vec<ApiForecastSlot>,
}

#[derive(Debug, Deserialize)]
struct ApiForecastSlot {
    dt_txt: String,
    main: ApiMain,
    #[serde(default)]
    weather: Vec<ApiConditions>,
}

#[derive(Debug, Deserialize)]
struct ApiMain {
    temp: f64,
    humidity: f64,
}

#[derive(Debug, Deserialize)]
struct ApiConditions {
    description: String,
}

#[derive(Clone)]
pub struct OpenWeatherProvider {
    http_client: HttpClient,
    api_key: String,
    api_url: String,
    cache: Cache,
    cache_ttl: u64,
}

impl OpenWeatherProvider {
    pub fn new(cache: Cache, api_key: String, api_url: String, cache_ttl: u64) -> AppResult<Self> {
        let http_client = HttpClient::builder().timeout(REQUEST_TIMEOUT).build()?;

        Ok(Self {
            http_client,
            api_key,
            api_url,
            cache,
            cache_ttl,
        })
    }

    async fn fetch_forecast(&self, latitude: f64, longitude: f64) -> AppResult<Vec<ForecastEntry>> {
        let url = format!("{}{}", self.api_url.trim_end_matches('/'), FORECAST_PATH);

        let response = self
            .http_client
            .get(&url)
            .query(&[
                ("lat", latitude.to_string()),
                ("lon", longitude.to_string()),
                ("appid", self.api_key.clone()),
                ("units", "metric".to_string()),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::ExternalApi(format!(
                "OpenWeather API returned status {}: {}",
                status, body
            )));
        }

        let body = response.text().await?;
        let entries = parse_forecast(&body)?;

        tracing::info!(
            latitude,
            longitude,
            slots = entries.len(),
            provider = "openweather",
            "Forecast fetched"
        );

        Ok(entries)
    }
}

/// Parses a forecast response body into entries.
///
/// Slots with an unreadable timestamp are skipped; a slot without a
/// conditions block gets an empty description.
fn parse_forecast(body: &str) -> AppResult<Vec<ForecastEntry>> {
    let response: ApiForecastResponse = serde_json::from_str(body).map_err(|e| {
        tracing::error!(error = %e, "Failed to deserialize OpenWeather response");
        AppError::ExternalApi(format!("Failed to parse OpenWeather response: {}", e))
    })?;

    let entries = response
        .list
        .into_iter()
        .filter_map(|slot| {
            let at = match NaiveDateTime::parse_from_str(&slot.dt_txt, SLOT_TIME_FORMAT) {
                Ok(at) => at,
                Err(e) => {
                    tracing::debug!(dt_txt = %slot.dt_txt, error = %e, "Skipping forecast slot");
                    return None;
                }
            };

            Some(ForecastEntry {
                at,
                description: slot
                    .weather
                    .into_iter()
                    .next()
                    .map(|w| w.description)
                    .unwrap_or_default(),
                temperature_c: slot.main.temp,
                humidity_pct: slot.main.humidity,
            })
        })
        .collect();

    Ok(entries)
}

#[async_trait::async_trait]
impl ForecastProvider for OpenWeatherProvider {
    async fn forecast(&self, latitude: f64, longitude: f64) -> AppResult<Vec<ForecastEntry>> {
        cached!(
            self.cache,
            CacheKey::forecast(latitude, longitude),
            self.cache_ttl,
            self.fetch_forecast(latitude, longitude)
        )
    }

    fn name(&self) -> &'static str {
        "openweather"
    }
}

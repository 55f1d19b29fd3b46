use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Weather conditions used to contextualize a recommendation
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, FromRow)]
pub struct WeatherSnapshot {
    #[sqlx(rename = "weather_description")]
    pub description: String,
    pub temperature_c: f64,
    pub humidity_pct: f64,
}

impl WeatherSnapshot {
    /// Conditions assumed when no forecast is available
    pub fn fallback() -> Self {
        Self {
            description: "partly cloudy".to_string(),
            temperature_c: 20.0,
            humidity_pct: 60.0,
        }
    }
}

/// One time slot of a provider forecast
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ForecastEntry {
    /// Slot start, as reported by the provider
    pub at: NaiveDateTime,
    pub description: String,
    pub temperature_c: f64,
    pub humidity_pct: f64,
}

impl From<&ForecastEntry> for WeatherSnapshot {
    fn from(entry: &ForecastEntry) -> Self {
        Self {
            description: entry.description.clone(),
            temperature_c: entry.temperature_c,
            humidity_pct: entry.humidity_pct,
        }
    }
}

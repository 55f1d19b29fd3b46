use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use std::sync::Arc;

use crate::{
    models::{ForecastEntry, WeatherSnapshot},
    services::{outcome::Outcome, providers::ForecastProvider},
};

/// Resolves the expected weather for an event
///
/// Never fails: provider errors and empty forecasts degrade to
/// [`WeatherSnapshot::fallback`].
#[derive(Clone)]
pub struct WeatherLookup {
    provider: Arc<dyn ForecastProvider>,
}

impl WeatherLookup {
    pub fn new(provider: Arc<dyn ForecastProvider>) -> Self {
        Self { provider }
    }

    pub async fn lookup(
        &self,
        latitude: f64,
        longitude: f64,
        date: NaiveDate,
        time: NaiveTime,
    ) -> Outcome<WeatherSnapshot> {
        let target = date.and_time(time);

        let entries = match self.provider.forecast(latitude, longitude).await {
            Ok(entries) => entries,
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    provider = self.provider.name(),
                    latitude,
                    longitude,
                    "Forecast unavailable, using fallback weather"
                );
                return Outcome::degraded(WeatherSnapshot::fallback(), e);
            }
        };

        match closest_entry(&entries, target) {
            Some(entry) => {
                tracing::debug!(slot = %entry.at, target = %target, "Matched forecast slot");
                Outcome::Success(WeatherSnapshot::from(entry))
            }
            None => {
                tracing::warn!(
                    provider = self.provider.name(),
                    latitude,
                    longitude,
                    "Forecast had no slots, using fallback weather"
                );
                Outcome::degraded(WeatherSnapshot::fallback(), "forecast contained no entries")
            }
        }
    }
}

/// The entry nearest to `target`; ties go to the earliest in list order.
///
/// Timestamps are compared as-is, without timezone conversion.
pub fn closest_entry(entries: &[ForecastEntry], target: NaiveDateTime) -> Option<&ForecastEntry> {
    entries
        .iter()
        .min_by_key(|entry| (entry.at - target).num_seconds().abs())
}

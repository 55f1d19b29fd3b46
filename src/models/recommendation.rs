use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt::Display;
use uuid::Uuid;

use super::{ensure_max_len, ensure_present, Perfume, PerfumeSummary, WeatherSnapshot};
use crate::error::{AppError, AppResult};

/// Forecasts only reach this many days ahead
pub const MAX_DAYS_AHEAD: i64 = 5;

const MAX_VENUE_NAME_LEN: usize = 200;
const MAX_VENUE_DESCRIPTION_LEN: usize = 300;
const MAX_CONTEXT_FIELD_LEN: usize = 200;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "venue_kind", rename_all = "lowercase")]
pub enum VenueKind {
    Indoor,
    Outdoor,
}

impl Display for VenueKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            VenueKind::Indoor => write!(f, "indoor"),
            VenueKind::Outdoor => write!(f, "outdoor"),
        }
    }
}

/// Where, when and why the user will wear the perfume
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, FromRow)]
pub struct EventContext {
    pub event_date: NaiveDate,
    pub event_time: NaiveTime,
    pub latitude: f64,
    pub longitude: f64,
    pub venue_name: String,
    pub venue_kind: VenueKind,
    #[serde(default)]
    pub venue_description: String,
    pub occasion: String,
    #[serde(default)]
    pub expectation: String,
    #[serde(default)]
    pub attire: String,
}

impl EventContext {
    /// Checks the request before any external call is made.
    ///
    /// `today` is injected so the date window can be tested deterministically.
    pub fn validate(&self, today: NaiveDate) -> AppResult<()> {
        if self.event_date < today {
            return Err(AppError::InvalidInput(
                "Event date cannot be in the past".to_string(),
            ));
        }
        if self.event_date > today + Duration::days(MAX_DAYS_AHEAD) {
            return Err(AppError::InvalidInput(format!(
                "Recommendations can only be requested for the next {} days",
                MAX_DAYS_AHEAD
            )));
        }

        if !self.latitude.is_finite() || !(-90.0..=90.0).contains(&self.latitude) {
            return Err(AppError::InvalidInput(
                "Latitude must be between -90 and 90".to_string(),
            ));
        }
        if !self.longitude.is_finite() || !(-180.0..=180.0).contains(&self.longitude) {
            return Err(AppError::InvalidInput(
                "Longitude must be between -180 and 180".to_string(),
            ));
        }

        ensure_present("venue_name", &self.venue_name, MAX_VENUE_NAME_LEN)?;
        ensure_max_len(
            "venue_description",
            &self.venue_description,
            MAX_VENUE_DESCRIPTION_LEN,
        )?;
        ensure_present("occasion", &self.occasion, MAX_CONTEXT_FIELD_LEN)?;
        ensure_max_len("expectation", &self.expectation, MAX_CONTEXT_FIELD_LEN)?;
        ensure_max_len("attire", &self.attire, MAX_CONTEXT_FIELD_LEN)?;

        Ok(())
    }
}

/// Everything the pipeline hands to persistence
#[derive(Debug, Clone, PartialEq)]
pub struct NewRecommendation {
    pub user_id: Uuid,
    pub event: EventContext,
    pub weather: WeatherSnapshot,
    pub weather_degraded: bool,
    pub prompt: String,
    pub ai_response: String,
    pub perfume_id: Option<Uuid>,
    pub explanation: String,
}

/// A persisted recommendation; never updated after insert
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct Recommendation {
    pub id: Uuid,
    pub user_id: Uuid,
    #[sqlx(flatten)]
    pub event: EventContext,
    #[sqlx(flatten)]
    pub weather: WeatherSnapshot,
    pub weather_degraded: bool,
    pub prompt: String,
    pub ai_response: String,
    pub perfume_id: Option<Uuid>,
    pub explanation: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RecommendationResponse {
    pub id: Uuid,
    #[serde(flatten)]
    pub event: EventContext,
    pub weather: WeatherSnapshot,
    pub weather_degraded: bool,
    pub perfume_id: Option<Uuid>,
    pub recommended_perfume: Option<PerfumeSummary>,
    pub explanation: String,
    pub ai_response: String,
    pub created_at: DateTime<Utc>,
}

impl RecommendationResponse {
    pub fn new(record: Recommendation, perfume: Option<&Perfume>) -> Self {
        Self {
            id: record.id,
            event: record.event,
            weather: record.weather,
            weather_degraded: record.weather_degraded,
            perfume_id: record.perfume_id,
            recommended_perfume: perfume.map(PerfumeSummary::from),
            explanation: record.explanation,
            ai_response: record.ai_response,
            created_at: record.created_at,
        }
    }
}

/// Query string of `GET /recommendations/history`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct HistoryQuery {
    pub limit: Option<i64>,
}

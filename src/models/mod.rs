pub mod perfume;
pub mod recommendation;
pub mod user;
pub mod weather;

pub use perfume::{CollectionEntry, CreatePerfumeRequest, Perfume, PerfumeSearchQuery, PerfumeSummary};
pub use recommendation::{
    EventContext, HistoryQuery, NewRecommendation, Recommendation, RecommendationResponse,
    VenueKind,
};
pub use user::{
    LoginRequest, RegisterRequest, SubscriptionStatus, TokenResponse, UpdateProfileRequest, User,
    UserProfile,
};
pub use weather::{ForecastEntry, WeatherSnapshot};

use crate::error::{AppError, AppResult};

/// Rejects `value` when it is longer than `max` characters
pub(crate) fn ensure_max_len(field: &str, value: &str, max: usize) -> AppResult<()> {
    if value.chars().count() > max {
        return Err(AppError::InvalidInput(format!(
            "{} must be at most {} characters",
            field, max
        )));
    }
    Ok(())
}

/// Rejects blank values and values longer than `max` characters
pub(crate) fn ensure_present(field: &str, value: &str, max: usize) -> AppResult<()> {
    if value.trim().is_empty() {
        return Err(AppError::InvalidInput(format!("{} cannot be empty", field)));
    }
    ensure_max_len(field, value, max)
}

/// Clamps an optional page size into `[1, max]`
pub(crate) fn clamp_limit(limit: Option<i64>, default: i64, max: i64) -> i64 {
    limit.unwrap_or(default).clamp(1, max)
}

/// External data providers consumed by the recommendation pipeline
///
/// Each provider is a thin HTTP client behind a trait, so the pipeline can be
/// exercised with mocks and the backing service swapped without touching it.
/// Providers report failures as errors; turning those into fallbacks is the
/// caller's job (see `services::weather` and `services::ai`).
use crate::{
    error::AppResult,
    models::ForecastEntry,
};

pub mod gemini;
pub mod openweather;

pub use gemini::GeminiProvider;
pub use openweather::OpenWeatherProvider;

/// Source of timestamped forecast slots for a location
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait ForecastProvider: Send + Sync {
    /// Fetch every forecast slot the provider has for the coordinates
    async fn forecast(&self, latitude: f64, longitude: f64) -> AppResult<Vec<ForecastEntry>>;

    /// Provider name for logging and debugging
    fn name(&self) -> &'static str;
}

/// Generative text model
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait TextGenerator: Send + Sync {
    /// Send a single prompt and return the model's first candidate text
    async fn generate(&self, prompt: &str) -> AppResult<String>;

    /// Provider name for logging and debugging
    fn name(&self) -> &'static str;
}

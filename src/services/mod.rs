pub mod ai;
pub mod matcher;
pub mod outcome;
pub mod prompt;
pub mod providers;
pub mod recommendations;
pub mod weather;

pub use ai::AiClient;
pub use outcome::Outcome;
pub use recommendations::{GeneratedRecommendation, RecommendationService, RecommendationStore};
pub use weather::WeatherLookup;

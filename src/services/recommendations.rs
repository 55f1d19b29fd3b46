use std::sync::Arc;
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::{EventContext, NewRecommendation, Perfume, Recommendation},
    services::{ai::AiClient, matcher, prompt, weather::WeatherLookup},
};

/// Persistence used by the pipeline's final step
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait RecommendationStore: Send + Sync {
    /// Consumes one query from the user's quota and inserts the record as a
    /// single unit. Fails with [`AppError::QuotaExhausted`] when no quota is
    /// left, in which case nothing is written.
    async fn record_and_consume_quota(&self, record: NewRecommendation) -> AppResult<Recommendation>;
}

/// Explanation stored alongside every recommendation
pub fn explanation_for(perfume: Option<&Perfume>) -> String {
    match perfume {
        Some(perfume) => format!("Recommendation: {}", perfume.name),
        None => "Recommendation: could not be determined".to_string(),
    }
}

/// A persisted recommendation with the perfume it resolved to
#[derive(Debug, Clone)]
pub struct GeneratedRecommendation {
    pub record: Recommendation,
    pub perfume: Option<Perfume>,
}

/// Runs the recommendation pipeline
///
/// weather lookup -> prompt -> text generation -> reply matching -> persistence.
/// Only persistence can fail; the external calls degrade to fallbacks, and no
/// transaction is held while they are in flight.
#[derive(Clone)]
pub struct RecommendationService {
    weather: WeatherLookup,
    ai: AiClient,
    store: Arc<dyn RecommendationStore>,
}

impl RecommendationService {
    pub fn new(weather: WeatherLookup, ai: AiClient, store: Arc<dyn RecommendationStore>) -> Self {
        Self { weather, ai, store }
    }

    /// `candidates` is the user's active collection; `event` must already be
    /// validated.
    pub async fn recommend(
        &self,
        user_id: Uuid,
        candidates: &[Perfume],
        event: &EventContext,
    ) -> AppResult<GeneratedRecommendation> {
        ensure_candidates(candidates)?;

        let weather = self
            .weather
            .lookup(event.latitude, event.longitude, event.event_date, event.event_time)
            .await;

        let prompt = prompt::build_prompt(candidates, event, weather.value());
        let reply = self.ai.complete(&prompt).await;

        let matched = matcher::match_reply(reply.value(), candidates);
        match &matched {
            Some(m) => tracing::info!(
                %user_id,
                perfume = %m.candidate.name,
                rule = %m.rule,
                "Reply matched a candidate"
            ),
            None => tracing::info!(
                %user_id,
                ai_degraded = reply.is_degraded(),
                "Reply matched no candidate"
            ),
        }
        let perfume = matched.map(|m| m.candidate.clone());

        let weather_degraded = weather.is_degraded();
        let record = NewRecommendation {
            user_id,
            event: event.clone(),
            weather: weather.into_value(),
            weather_degraded,
            prompt,
            ai_response: reply.into_value(),
            perfume_id: perfume.as_ref().map(|p| p.id),
            explanation: explanation_for(perfume.as_ref()),
        };

        let record = self.store.record_and_consume_quota(record).await?;

        tracing::info!(
            recommendation_id = %record.id,
            %user_id,
            weather_degraded,
            matched = record.perfume_id.is_some(),
            "Recommendation stored"
        );

        Ok(GeneratedRecommendation { record, perfume })
    }
}

/// A recommendation needs at least one perfume to choose from
pub fn ensure_candidates(candidates: &[Perfume]) -> AppResult<()> {
    if candidates.is_empty() {
        return Err(AppError::InvalidInput(
            "Your collection is empty. Add perfumes before requesting a recommendation".to_string(),
        ));
    }
    Ok(())
}

use std::{sync::Arc, time::Duration};

use crate::services::{outcome::Outcome, providers::TextGenerator};

/// Stored and returned in place of a model reply when generation fails
pub const AI_FALLBACK_REPLY: &str = "No recommendation could be generated at this time.";

/// Default bound on a single generation call
pub const DEFAULT_AI_TIMEOUT: Duration = Duration::from_secs(30);

/// Fail-soft wrapper around a [`TextGenerator`]
///
/// Timeouts, transport errors and unusable payloads all collapse into
/// [`AI_FALLBACK_REPLY`]. Nothing is retried.
#[derive(Clone)]
pub struct AiClient {
    generator: Arc<dyn TextGenerator>,
    timeout: Duration,
}

impl AiClient {
    pub fn new(generator: Arc<dyn TextGenerator>, timeout: Duration) -> Self {
        Self { generator, timeout }
    }

    pub async fn complete(&self, prompt: &str) -> Outcome<String> {
        let cause = match tokio::time::timeout(self.timeout, self.generator.generate(prompt)).await {
            Ok(Ok(text)) => return Outcome::Success(text),
            Ok(Err(e)) => e.to_string(),
            Err(_) => format!("no reply within {}s", self.timeout.as_secs_f32()),
        };

        tracing::warn!(
            provider = self.generator.name(),
            cause = %cause,
            "Text generation failed, using fallback reply"
        );

        Outcome::degraded(AI_FALLBACK_REPLY.to_string(), cause)
    }
}

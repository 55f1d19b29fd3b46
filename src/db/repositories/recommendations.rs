use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::models::{NewRecommendation, Recommendation};
use crate::services::RecommendationStore;

const COLUMNS: &str = "id, user_id, event_date, event_time, latitude, longitude, venue_name, \
    venue_kind, venue_description, occasion, expectation, attire, weather_description, \
    temperature_c, humidity_pct, weather_degraded, prompt, ai_response, perfume_id, \
    explanation, created_at";

pub const DEFAULT_HISTORY_LIMIT: i64 = 10;
pub const MAX_HISTORY_LIMIT: i64 = 50;

/// Read access to stored recommendations. Records are never updated.
pub struct RecommendationRepo;

impl RecommendationRepo {
    /// Most recent recommendations of `user_id`, newest first
    pub async fn list_for_user(
        pool: &PgPool,
        user_id: Uuid,
        limit: i64,
    ) -> AppResult<Vec<Recommendation>> {
        let query = format!(
            "SELECT {COLUMNS} FROM recommendations \
             WHERE user_id = $1 \
             ORDER BY created_at DESC \
             LIMIT $2"
        );
        let records = sqlx::query_as::<_, Recommendation>(&query)
            .bind(user_id)
            .bind(limit)
            .fetch_all(pool)
            .await?;
        Ok(records)
    }

    /// A single recommendation, only if it belongs to `user_id`
    pub async fn find_for_user(
        pool: &PgPool,
        id: Uuid,
        user_id: Uuid,
    ) -> AppResult<Option<Recommendation>> {
        let query = format!("SELECT {COLUMNS} FROM recommendations WHERE id = $1 AND user_id = $2");
        let record = sqlx::query_as::<_, Recommendation>(&query)
            .bind(id)
            .bind(user_id)
            .fetch_optional(pool)
            .await?;
        Ok(record)
    }
}

/// Postgres-backed [`RecommendationStore`]
#[derive(Clone)]
pub struct PgRecommendationStore {
    pool: PgPool,
}

impl PgRecommendationStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl RecommendationStore for PgRecommendationStore {
    async fn record_and_consume_quota(&self, record: NewRecommendation) -> AppResult<Recommendation> {
        let mut tx = self.pool.begin().await?;

        // Conditional decrement: concurrent requests serialize on the row lock,
        // and the loser sees zero and matches nothing
        let remaining: Option<i32> = sqlx::query_scalar(
            "UPDATE users \
             SET queries_remaining = queries_remaining - 1, updated_at = NOW() \
             WHERE id = $1 AND queries_remaining > 0 \
             RETURNING queries_remaining",
        )
        .bind(record.user_id)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(remaining) = remaining else {
            tx.rollback().await?;
            return Err(AppError::QuotaExhausted);
        };

        let query = format!(
            "INSERT INTO recommendations ({COLUMNS}) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, $18, $19, $20, NOW()) \
             RETURNING {COLUMNS}"
        );
        let event = &record.event;
        // Dropping `tx` on error rolls back the decrement
        let saved = sqlx::query_as::<_, Recommendation>(&query)
            .bind(Uuid::new_v4())
            .bind(record.user_id)
            .bind(event.event_date)
            .bind(event.event_time)
            .bind(event.latitude)
            .bind(event.longitude)
            .bind(&event.venue_name)
            .bind(event.venue_kind)
            .bind(&event.venue_description)
            .bind(&event.occasion)
            .bind(&event.expectation)
            .bind(&event.attire)
            .bind(&record.weather.description)
            .bind(record.weather.temperature_c)
            .bind(record.weather.humidity_pct)
            .bind(record.weather_degraded)
            .bind(&record.prompt)
            .bind(&record.ai_response)
            .bind(record.perfume_id)
            .bind(&record.explanation)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;

        tracing::debug!(
            user_id = %record.user_id,
            queries_remaining = remaining,
            "Quota consumed"
        );

        Ok(saved)
    }
}

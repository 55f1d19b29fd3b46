use sqlx::PgPool;
use std::sync::Arc;

use crate::auth::JwtConfig;
use crate::services::RecommendationService;

/// Shared application state, cloned into every handler
#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub jwt: JwtConfig,
    pub recommender: Arc<RecommendationService>,
}

impl AppState {
    pub fn new(db_pool: PgPool, jwt: JwtConfig, recommender: RecommendationService) -> Self {
        Self {
            db_pool,
            jwt,
            recommender: Arc::new(recommender),
        }
    }
}

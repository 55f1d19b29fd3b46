use std::{sync::Arc, time::Duration};

use sillage_api::{
    auth::JwtConfig,
    config::Config,
    create_router,
    db::{self, repositories::PgRecommendationStore, Cache},
    services::{
        providers::{GeminiProvider, OpenWeatherProvider},
        AiClient, RecommendationService, WeatherLookup,
    },
    AppState,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("sillage_api=info,tower_http=info")),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;

    let db_pool = db::create_pool(&config.database_url, config.database_max_connections).await?;
    db::run_migrations(&db_pool).await?;

    let redis_client = db::create_redis_client(&config.redis_url)?;
    let (cache, cache_writer) = Cache::new(redis_client);

    let forecast = OpenWeatherProvider::new(
        cache,
        config.openweather_api_key.clone(),
        config.openweather_api_url.clone(),
        config.weather_cache_ttl_secs,
    )?;
    let ai_timeout = Duration::from_secs(config.ai_timeout_secs);
    let generator = GeminiProvider::new(
        config.gemini_api_key.clone(),
        config.gemini_api_url.clone(),
        config.gemini_model.clone(),
        ai_timeout,
    )?;

    let recommender = RecommendationService::new(
        WeatherLookup::new(Arc::new(forecast)),
        AiClient::new(Arc::new(generator), ai_timeout),
        Arc::new(PgRecommendationStore::new(db_pool.clone())),
    );

    let state = AppState::new(db_pool, JwtConfig::from(&config), recommender);
    let app = create_router(state);

    let address = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&address).await?;
    tracing::info!(%address, model = %config.gemini_model, "Server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    cache_writer.shutdown().await;
    tracing::info!("Server stopped");

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
    }
    tracing::info!("Shutdown signal received");
}

use axum::{
    http::StatusCode,
    middleware,
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{
    middleware::{make_span_with_request_id, request_id_middleware},
    state::AppState,
};

pub mod auth;
pub mod perfumes;
pub mod recommendations;
pub mod users;

/// Creates the application router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .nest("/api/v1", api_routes())
        .with_state(state)
        .layer(TraceLayer::new_for_http().make_span_with(make_span_with_request_id))
        .layer(CorsLayer::permissive())
        // Outermost, so the trace span already sees the request id
        .layer(middleware::from_fn(request_id_middleware))
}

/// API routes under /api/v1
fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .route("/users/me", get(users::me).put(users::update_me))
        .route("/users/me/subscription", get(users::subscription))
        .route("/perfumes", post(perfumes::create))
        .route("/perfumes/search", get(perfumes::search))
        .route("/perfumes/collection", get(perfumes::collection))
        .route(
            "/perfumes/collection/:perfume_id",
            post(perfumes::add_to_collection).delete(perfumes::remove_from_collection),
        )
        .route("/recommendations", post(recommendations::recommend))
        .route("/recommendations/history", get(recommendations::history))
        .route("/recommendations/:id", get(recommendations::get_one))
}

/// Health check endpoint
async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}

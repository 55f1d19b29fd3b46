use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};
use uuid::Uuid;

use crate::{
    db::repositories::{CollectionRepo, PerfumeRepo},
    error::{AppError, AppResult},
    middleware::CurrentUser,
    models::{CollectionEntry, CreatePerfumeRequest, Perfume, PerfumeSearchQuery},
    state::AppState,
};

/// `GET /perfumes/search`
pub async fn search(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Query(params): Query<PerfumeSearchQuery>,
) -> AppResult<Json<Vec<Perfume>>> {
    let perfumes = PerfumeRepo::search(&state.db_pool, user.id, &params).await?;
    Ok(Json(perfumes))
}

/// `POST /perfumes`: the new perfume is private to its creator and joins their collection
pub async fn create(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(request): Json<CreatePerfumeRequest>,
) -> AppResult<(StatusCode, Json<Perfume>)> {
    let request = request.normalized();
    request.validate()?;

    let perfume = PerfumeRepo::create_for_user(&state.db_pool, user.id, &request).await?;

    tracing::info!(user_id = %user.id, perfume_id = %perfume.id, "Private perfume created");

    Ok((StatusCode::CREATED, Json(perfume)))
}

/// `GET /perfumes/collection`
pub async fn collection(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> AppResult<Json<Vec<CollectionEntry>>> {
    let entries = CollectionRepo::list_active(&state.db_pool, user.id).await?;
    Ok(Json(entries))
}

/// `POST /perfumes/collection/:perfume_id`
pub async fn add_to_collection(
    State(state): State<AppState>,
    Path(perfume_id): Path<Uuid>,
    CurrentUser(user): CurrentUser,
) -> AppResult<(StatusCode, Json<Value>)> {
    PerfumeRepo::find_visible(&state.db_pool, perfume_id, user.id)
        .await?
        .ok_or_else(|| AppError::NotFound("Perfume not found".to_string()))?;

    if !CollectionRepo::add(&state.db_pool, user.id, perfume_id).await? {
        return Err(AppError::Conflict(
            "Perfume is already in your collection".to_string(),
        ));
    }

    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "Perfume added to collection" })),
    ))
}

/// `DELETE /perfumes/collection/:perfume_id`: soft delete, the membership row is kept
pub async fn remove_from_collection(
    State(state): State<AppState>,
    Path(perfume_id): Path<Uuid>,
    CurrentUser(user): CurrentUser,
) -> AppResult<Json<Value>> {
    if !CollectionRepo::remove(&state.db_pool, user.id, perfume_id).await? {
        return Err(AppError::NotFound(
            "Perfume is not in your collection".to_string(),
        ));
    }

    Ok(Json(json!({ "message": "Perfume removed from collection" })))
}

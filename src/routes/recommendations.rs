use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use std::collections::HashMap;
use uuid::Uuid;

use crate::{
    db::repositories::{
        recommendations::{DEFAULT_HISTORY_LIMIT, MAX_HISTORY_LIMIT},
        CollectionRepo, PerfumeRepo, RecommendationRepo,
    },
    error::{AppError, AppResult},
    middleware::SubscribedUser,
    models::{clamp_limit, EventContext, HistoryQuery, Perfume, RecommendationResponse},
    services::recommendations::ensure_candidates,
    state::AppState,
};

/// `POST /recommendations`
pub async fn recommend(
    State(state): State<AppState>,
    SubscribedUser(user): SubscribedUser,
    Json(event): Json<EventContext>,
) -> AppResult<(StatusCode, Json<RecommendationResponse>)> {
    event.validate(chrono::Local::now().date_naive())?;

    let candidates = CollectionRepo::active_perfumes(&state.db_pool, user.id).await?;
    ensure_candidates(&candidates)?;

    let generated = state.recommender.recommend(user.id, &candidates, &event).await?;

    Ok((
        StatusCode::CREATED,
        Json(RecommendationResponse::new(
            generated.record,
            generated.perfume.as_ref(),
        )),
    ))
}

/// `GET /recommendations/history`
pub async fn history(
    State(state): State<AppState>,
    SubscribedUser(user): SubscribedUser,
    Query(params): Query<HistoryQuery>,
) -> AppResult<Json<Vec<RecommendationResponse>>> {
    let limit = clamp_limit(params.limit, DEFAULT_HISTORY_LIMIT, MAX_HISTORY_LIMIT);
    let records = RecommendationRepo::list_for_user(&state.db_pool, user.id, limit).await?;

    let mut perfume_ids: Vec<Uuid> = records.iter().filter_map(|r| r.perfume_id).collect();
    perfume_ids.sort_unstable();
    perfume_ids.dedup();

    let perfumes: HashMap<Uuid, Perfume> = PerfumeRepo::find_by_ids(&state.db_pool, &perfume_ids)
        .await?
        .into_iter()
        .map(|p| (p.id, p))
        .collect();

    let responses = records
        .into_iter()
        .map(|record| {
            let perfume = record.perfume_id.and_then(|id| perfumes.get(&id));
            RecommendationResponse::new(record, perfume)
        })
        .collect();

    Ok(Json(responses))
}

/// `GET /recommendations/:id`
pub async fn get_one(
    State(state): State<AppState>,
    SubscribedUser(user): SubscribedUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<RecommendationResponse>> {
    let record = RecommendationRepo::find_for_user(&state.db_pool, id, user.id)
        .await?
        .ok_or_else(|| AppError::NotFound("Recommendation not found".to_string()))?;

    let perfume = match record.perfume_id {
        Some(perfume_id) => PerfumeRepo::find_by_ids(&state.db_pool, &[perfume_id])
            .await?
            .into_iter()
            .next(),
        None => None,
    };

    Ok(Json(RecommendationResponse::new(record, perfume.as_ref())))
}

use axum::{extract::State, Json};

use crate::{
    auth::hash_password,
    db::repositories::UserRepo,
    error::{AppError, AppResult},
    middleware::CurrentUser,
    models::{SubscriptionStatus, UpdateProfileRequest, UserProfile},
    state::AppState,
};

/// `GET /users/me`
pub async fn me(CurrentUser(user): CurrentUser) -> Json<UserProfile> {
    Json(UserProfile::from(&user))
}

/// `PUT /users/me`
pub async fn update_me(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(request): Json<UpdateProfileRequest>,
) -> AppResult<Json<UserProfile>> {
    request.validate()?;

    let password_hash = request
        .password
        .as_deref()
        .map(hash_password)
        .transpose()?;

    let updated = UserRepo::update_profile(
        &state.db_pool,
        user.id,
        request.first_name.as_deref().map(str::trim),
        request.last_name.as_deref().map(str::trim),
        password_hash.as_deref(),
    )
    .await?
    .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    tracing::info!(user_id = %user.id, password_changed = password_hash.is_some(), "Profile updated");

    Ok(Json(UserProfile::from(&updated)))
}

/// `GET /users/me/subscription`
pub async fn subscription(CurrentUser(user): CurrentUser) -> Json<SubscriptionStatus> {
    Json(SubscriptionStatus::from(&user))
}

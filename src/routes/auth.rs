use axum::{extract::State, http::StatusCode, Json};

use crate::{
    auth::{generate_access_token, hash_password, verify_password},
    db::repositories::{users::NewUser, UserRepo},
    error::{AppError, AppResult},
    models::{LoginRequest, RegisterRequest, TokenResponse, User},
    state::AppState,
};

fn issue_token(state: &AppState, user: &User) -> AppResult<TokenResponse> {
    let token = generate_access_token(user.id, &state.jwt)
        .map_err(|e| AppError::Internal(format!("Failed to sign token: {}", e)))?;
    Ok(TokenResponse::bearer(token, user))
}

/// `POST /auth/register`
pub async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> AppResult<(StatusCode, Json<TokenResponse>)> {
    request.validate()?;

    let email = request.normalized_email();
    let password_hash = hash_password(&request.password)?;

    let user = UserRepo::create(
        &state.db_pool,
        NewUser {
            email: &email,
            password_hash: &password_hash,
            first_name: request.first_name.as_deref().map(str::trim),
            last_name: request.last_name.as_deref().map(str::trim),
        },
    )
    .await?;

    tracing::info!(user_id = %user.id, "User registered");

    Ok((StatusCode::CREATED, Json(issue_token(&state, &user)?)))
}

/// `POST /auth/login`
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> AppResult<Json<TokenResponse>> {
    let email = request.email.trim().to_lowercase();
    let invalid = || AppError::Unauthorized("Incorrect email or password".to_string());

    let user = UserRepo::find_by_email(&state.db_pool, &email)
        .await?
        .ok_or_else(invalid)?;

    if !verify_password(&request.password, &user.password_hash) {
        tracing::info!(user_id = %user.id, "Login rejected: wrong password");
        return Err(invalid());
    }

    if !user.is_active {
        return Err(AppError::InvalidInput("Account is inactive".to_string()));
    }

    UserRepo::record_login(&state.db_pool, user.id).await?;

    Ok(Json(issue_token(&state, &user)?))
}

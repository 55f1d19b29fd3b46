//! Bearer-token extractors.
//!
//! Handlers pick the weakest extractor they need: [`AuthUser`] only checks the
//! token, [`CurrentUser`] also loads the user row, and [`SubscribedUser`]
//! additionally enforces an active subscription with quota left.

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use uuid::Uuid;

use crate::auth::validate_token;
use crate::db::repositories::UserRepo;
use crate::error::AppError;
use crate::models::User;
use crate::state::AppState;

/// Identity taken from a valid access token
#[derive(Debug, Clone, Copy)]
pub struct AuthUser {
    pub user_id: Uuid,
}

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| AppError::Unauthorized("Missing Authorization header".to_string()))?;

        let token = auth_header.strip_prefix("Bearer ").ok_or_else(|| {
            AppError::Unauthorized(
                "Invalid Authorization format. Expected: Bearer <token>".to_string(),
            )
        })?;

        let claims = validate_token(token, &state.jwt)
            .map_err(|_| AppError::Unauthorized("Invalid or expired token".to_string()))?;

        tracing::Span::current().record("user_id", tracing::field::display(claims.sub));

        Ok(AuthUser {
            user_id: claims.sub,
        })
    }
}

/// The authenticated, active user row.
///
/// A token for a deleted user is rejected with 401; a deactivated account gets
/// the same 400 that login returns.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

impl CurrentUser {
    pub fn check(user: Option<User>) -> Result<Self, AppError> {
        let user =
            user.ok_or_else(|| AppError::Unauthorized("User no longer exists".to_string()))?;
        if !user.is_active {
            return Err(AppError::InvalidInput("Account is inactive".to_string()));
        }
        Ok(CurrentUser(user))
    }
}

#[async_trait]
impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let AuthUser { user_id } = AuthUser::from_request_parts(parts, state).await?;

        let user = UserRepo::find_by_id(&state.db_pool, user_id).await?;
        CurrentUser::check(user)
    }
}

/// A user allowed to request recommendations right now
#[derive(Debug, Clone)]
pub struct SubscribedUser(pub User);

impl SubscribedUser {
    /// Subscription is checked before quota
    pub fn check(user: User) -> Result<Self, AppError> {
        if !user.subscribed {
            return Err(AppError::PaymentRequired(
                "An active subscription is required".to_string(),
            ));
        }
        if user.queries_remaining <= 0 {
            return Err(AppError::QuotaExhausted);
        }
        Ok(SubscribedUser(user))
    }
}

#[async_trait]
impl FromRequestParts<AppState> for SubscribedUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let CurrentUser(user) = CurrentUser::from_request_parts(parts, state).await?;
        SubscribedUser::check(user)
    }
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::ensure_max_len;
use crate::error::{AppError, AppResult};

pub const MIN_PASSWORD_LEN: usize = 6;
pub const MAX_PERSON_NAME_LEN: usize = 50;

/// A user row, including the password hash
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub password_hash: String,
    pub is_active: bool,
    pub is_verified: bool,
    pub is_superuser: bool,
    pub subscribed: bool,
    /// Recommendation requests left in the current period
    pub queries_remaining: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
    pub last_login: Option<DateTime<Utc>>,
}

/// Public view of a user
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UserProfile {
    pub id: Uuid,
    pub email: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub is_active: bool,
    pub is_verified: bool,
    pub subscribed: bool,
    pub queries_remaining: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl From<&User> for UserProfile {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            email: user.email.clone(),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            is_active: user.is_active,
            is_verified: user.is_verified,
            subscribed: user.subscribed,
            queries_remaining: user.queries_remaining,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

fn validate_password(password: &str) -> AppResult<()> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(AppError::InvalidInput(format!(
            "Password must be at least {} characters long",
            MIN_PASSWORD_LEN
        )));
    }
    Ok(())
}

fn validate_names(first_name: Option<&str>, last_name: Option<&str>) -> AppResult<()> {
    if let Some(first) = first_name {
        ensure_max_len("first_name", first, MAX_PERSON_NAME_LEN)?;
    }
    if let Some(last) = last_name {
        ensure_max_len("last_name", last, MAX_PERSON_NAME_LEN)?;
    }
    Ok(())
}

/// Body of `POST /auth/register`
#[derive(Debug, Clone, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
}

impl RegisterRequest {
    pub fn validate(&self) -> AppResult<()> {
        let email = self.email.trim();
        let well_formed = email
            .split_once('@')
            .map(|(local, domain)| !local.is_empty() && domain.contains('.'))
            .unwrap_or(false);
        if !well_formed {
            return Err(AppError::InvalidInput("Invalid email address".to_string()));
        }
        validate_password(&self.password)?;
        validate_names(self.first_name.as_deref(), self.last_name.as_deref())
    }

    /// Emails are stored lowercased so lookups are case-insensitive
    pub fn normalized_email(&self) -> String {
        self.email.trim().to_lowercase()
    }
}

/// Body of `POST /auth/login`
#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Body of `PUT /users/me`; absent fields are left untouched
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateProfileRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub password: Option<String>,
}

impl UpdateProfileRequest {
    pub fn validate(&self) -> AppResult<()> {
        if let Some(password) = &self.password {
            validate_password(password)?;
        }
        validate_names(self.first_name.as_deref(), self.last_name.as_deref())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
    pub user: UserProfile,
}

impl TokenResponse {
    pub fn bearer(access_token: String, user: &User) -> Self {
        Self {
            access_token,
            token_type: "bearer".to_string(),
            user: UserProfile::from(user),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SubscriptionStatus {
    pub subscribed: bool,
    pub queries_remaining: i32,
    pub message: String,
}

impl From<&User> for SubscriptionStatus {
    fn from(user: &User) -> Self {
        let message = if user.subscribed {
            "Active subscription"
        } else {
            "No active subscription"
        };
        Self {
            subscribed: user.subscribed,
            queries_remaining: user.queries_remaining,
            message: message.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn register(email: &str, password: &str) -> RegisterRequest {
        RegisterRequest {
            email: email.to_string(),
            password: password.to_string(),
            first_name: None,
            last_name: None,
        }
    }

    #[test]
    fn test_register_validation() {
        assert!(register("ana@example.com", "secret1").validate().is_ok());
        assert!(register("not-an-email", "secret1").validate().is_err());
        assert!(register("@example.com", "secret1").validate().is_err());
        assert!(register("ana@example.com", "short").validate().is_err());
    }

    #[test]
    fn test_register_rejects_long_names() {
        let mut request = register("ana@example.com", "secret1");
        request.first_name = Some("a".repeat(MAX_PERSON_NAME_LEN + 1));
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_normalized_email() {
        let request = register("  Ana@Example.COM ", "secret1");
        assert_eq!(request.normalized_email(), "ana@example.com");
    }

    #[test]
    fn test_update_profile_validation() {
        assert!(UpdateProfileRequest::default().validate().is_ok());

        let short_password = UpdateProfileRequest {
            password: Some("123".to_string()),
            ..Default::default()
        };
        assert!(short_password.validate().is_err());
    }

    #[test]
    fn test_subscription_status_message() {
        let user = User {
            id: Uuid::new_v4(),
            email: "ana@example.com".to_string(),
            first_name: None,
            last_name: None,
            password_hash: "hash".to_string(),
            is_active: true,
            is_verified: false,
            is_superuser: false,
            subscribed: true,
            queries_remaining: 4,
            created_at: Utc::now(),
            updated_at: None,
            last_login: None,
        };

        let status = SubscriptionStatus::from(&user);
        assert!(status.subscribed);
        assert_eq!(status.queries_remaining, 4);
        assert_eq!(status.message, "Active subscription");
    }
}

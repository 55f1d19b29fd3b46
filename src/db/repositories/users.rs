use sqlx::PgPool;
use uuid::Uuid;

use super::is_unique_violation;
use crate::error::{AppError, AppResult};
use crate::models::User;

const COLUMNS: &str = "id, email, first_name, last_name, password_hash, is_active, is_verified, \
    is_superuser, subscribed, queries_remaining, created_at, updated_at, last_login";

/// Data needed to insert a user
#[derive(Debug, Clone)]
pub struct NewUser<'a> {
    pub email: &'a str,
    pub password_hash: &'a str,
    pub first_name: Option<&'a str>,
    pub last_name: Option<&'a str>,
}

pub struct UserRepo;

impl UserRepo {
    /// Inserts an active, unsubscribed user with no quota.
    ///
    /// A duplicate email is reported as [`AppError::Conflict`].
    pub async fn create(pool: &PgPool, new_user: NewUser<'_>) -> AppResult<User> {
        let query = format!(
            "INSERT INTO users (id, email, password_hash, first_name, last_name) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING {COLUMNS}"
        );

        sqlx::query_as::<_, User>(&query)
            .bind(Uuid::new_v4())
            .bind(new_user.email)
            .bind(new_user.password_hash)
            .bind(new_user.first_name)
            .bind(new_user.last_name)
            .fetch_one(pool)
            .await
            .map_err(|e| {
                if is_unique_violation(&e) {
                    AppError::Conflict("Email already registered".to_string())
                } else {
                    AppError::Database(e)
                }
            })
    }

    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> AppResult<Option<User>> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE id = $1");
        let user = sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await?;
        Ok(user)
    }

    pub async fn find_by_email(pool: &PgPool, email: &str) -> AppResult<Option<User>> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE email = $1");
        let user = sqlx::query_as::<_, User>(&query)
            .bind(email)
            .fetch_optional(pool)
            .await?;
        Ok(user)
    }

    /// Updates the supplied fields only; `None` leaves a column untouched
    pub async fn update_profile(
        pool: &PgPool,
        id: Uuid,
        first_name: Option<&str>,
        last_name: Option<&str>,
        password_hash: Option<&str>,
    ) -> AppResult<Option<User>> {
        let query = format!(
            "UPDATE users SET \
                first_name    = COALESCE($1, first_name), \
                last_name     = COALESCE($2, last_name), \
                password_hash = COALESCE($3, password_hash), \
                updated_at    = NOW() \
             WHERE id = $4 \
             RETURNING {COLUMNS}"
        );

        let user = sqlx::query_as::<_, User>(&query)
            .bind(first_name)
            .bind(last_name)
            .bind(password_hash)
            .bind(id)
            .fetch_optional(pool)
            .await?;
        Ok(user)
    }

    pub async fn record_login(pool: &PgPool, id: Uuid) -> AppResult<()> {
        sqlx::query("UPDATE users SET last_login = NOW() WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(())
    }
}

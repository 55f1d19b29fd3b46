use sqlx::PgPool;
use uuid::Uuid;

use super::perfumes::P_COLUMNS;
use crate::error::AppResult;
use crate::models::{CollectionEntry, Perfume};

/// Soft-deletable user/perfume memberships.
///
/// Only rows with `removed_at IS NULL` count as "in the collection".
pub struct CollectionRepo;

impl CollectionRepo {
    /// Active memberships of `user_id`, newest first, limited to perfumes the user may see
    pub async fn list_active(pool: &PgPool, user_id: Uuid) -> AppResult<Vec<CollectionEntry>> {
        let query = format!(
            "SELECT {P_COLUMNS}, c.added_at \
             FROM perfume_collections c \
             JOIN perfumes p ON p.id = c.perfume_id \
             WHERE c.user_id = $1 \
               AND c.removed_at IS NULL \
               AND (p.is_private = FALSE OR p.created_by = $1) \
             ORDER BY c.added_at DESC"
        );
        let entries = sqlx::query_as::<_, CollectionEntry>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await?;
        Ok(entries)
    }

    /// The perfumes behind [`CollectionRepo::list_active`], oldest membership first
    pub async fn active_perfumes(pool: &PgPool, user_id: Uuid) -> AppResult<Vec<Perfume>> {
        let query = format!(
            "SELECT {P_COLUMNS} \
             FROM perfume_collections c \
             JOIN perfumes p ON p.id = c.perfume_id \
             WHERE c.user_id = $1 \
               AND c.removed_at IS NULL \
               AND (p.is_private = FALSE OR p.created_by = $1) \
             ORDER BY c.added_at"
        );
        let perfumes = sqlx::query_as::<_, Perfume>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await?;
        Ok(perfumes)
    }

    /// Inserts a fresh active membership. Returns `false` if one already exists.
    ///
    /// Relies on the partial unique index over active rows, so concurrent adds
    /// cannot create duplicates.
    pub async fn add(pool: &PgPool, user_id: Uuid, perfume_id: Uuid) -> AppResult<bool> {
        let result = sqlx::query(
            "INSERT INTO perfume_collections (id, user_id, perfume_id) \
             VALUES ($1, $2, $3) \
             ON CONFLICT (user_id, perfume_id) WHERE removed_at IS NULL DO NOTHING",
        )
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(perfume_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Marks the active membership as removed. Returns `false` if there was none.
    pub async fn remove(pool: &PgPool, user_id: Uuid, perfume_id: Uuid) -> AppResult<bool> {
        let result = sqlx::query(
            "UPDATE perfume_collections SET removed_at = NOW() \
             WHERE user_id = $1 AND perfume_id = $2 AND removed_at IS NULL",
        )
        .bind(user_id)
        .bind(perfume_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}

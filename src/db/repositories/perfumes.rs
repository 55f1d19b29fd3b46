use sqlx::PgPool;
use uuid::Uuid;

use crate::error::AppResult;
use crate::models::{clamp_limit, CreatePerfumeRequest, Perfume, PerfumeSearchQuery};

pub(crate) const COLUMNS: &str =
    "id, name, brand, perfumer, notes, accords, is_private, created_by, created_at, updated_at";

/// [`COLUMNS`] qualified with the `p` alias, for joins
pub(crate) const P_COLUMNS: &str = "p.id, p.name, p.brand, p.perfumer, p.notes, p.accords, \
    p.is_private, p.created_by, p.created_at, p.updated_at";

pub const DEFAULT_SEARCH_LIMIT: i64 = 50;
pub const MAX_SEARCH_LIMIT: i64 = 100;

pub struct PerfumeRepo;

impl PerfumeRepo {
    /// Searches perfumes visible to `viewer`: public ones plus the viewer's private ones.
    ///
    /// `q` and `brand` are literal substrings, so `%` and `_` carry no pattern meaning.
    pub async fn search(
        pool: &PgPool,
        viewer: Uuid,
        params: &PerfumeSearchQuery,
    ) -> AppResult<Vec<Perfume>> {
        let limit = clamp_limit(params.limit, DEFAULT_SEARCH_LIMIT, MAX_SEARCH_LIMIT);
        let non_blank = |value: &Option<String>| {
            value
                .as_deref()
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(str::to_string)
        };

        let query = format!(
            "SELECT {COLUMNS} FROM perfumes \
             WHERE (is_private = FALSE OR created_by = $1) \
               AND ($2::TEXT IS NULL OR strpos(lower(name), lower($2)) > 0 \
                    OR strpos(lower(brand), lower($2)) > 0) \
               AND ($3::TEXT IS NULL OR strpos(lower(brand), lower($3)) > 0) \
               AND ($4::TEXT IS NULL OR $4 = ANY(accords)) \
             ORDER BY name, brand \
             LIMIT $5"
        );

        let perfumes = sqlx::query_as::<_, Perfume>(&query)
            .bind(viewer)
            .bind(non_blank(&params.q))
            .bind(non_blank(&params.brand))
            .bind(non_blank(&params.accord))
            .bind(limit)
            .fetch_all(pool)
            .await?;
        Ok(perfumes)
    }

    /// Finds a perfume only if `viewer` is allowed to see it
    pub async fn find_visible(pool: &PgPool, id: Uuid, viewer: Uuid) -> AppResult<Option<Perfume>> {
        let query = format!(
            "SELECT {COLUMNS} FROM perfumes \
             WHERE id = $1 AND (is_private = FALSE OR created_by = $2)"
        );
        let perfume = sqlx::query_as::<_, Perfume>(&query)
            .bind(id)
            .bind(viewer)
            .fetch_optional(pool)
            .await?;
        Ok(perfume)
    }

    pub async fn find_by_ids(pool: &PgPool, ids: &[Uuid]) -> AppResult<Vec<Perfume>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let query = format!("SELECT {COLUMNS} FROM perfumes WHERE id = ANY($1)");
        let perfumes = sqlx::query_as::<_, Perfume>(&query)
            .bind(ids)
            .fetch_all(pool)
            .await?;
        Ok(perfumes)
    }

    /// Creates a private perfume owned by `creator` and adds it to the
    /// creator's collection, in one transaction
    pub async fn create_for_user(
        pool: &PgPool,
        creator: Uuid,
        request: &CreatePerfumeRequest,
    ) -> AppResult<Perfume> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "INSERT INTO perfumes (id, name, brand, perfumer, notes, accords, is_private, created_by) \
             VALUES ($1, $2, $3, $4, $5, $6, TRUE, $7) \
             RETURNING {COLUMNS}"
        );
        let perfume = sqlx::query_as::<_, Perfume>(&query)
            .bind(Uuid::new_v4())
            .bind(&request.name)
            .bind(&request.brand)
            .bind(&request.perfumer)
            .bind(&request.notes)
            .bind(&request.accords)
            .bind(creator)
            .fetch_one(&mut *tx)
            .await?;

        sqlx::query(
            "INSERT INTO perfume_collections (id, user_id, perfume_id) VALUES ($1, $2, $3)",
        )
        .bind(Uuid::new_v4())
        .bind(creator)
        .bind(perfume.id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(perfume)
    }
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::{ensure_max_len, ensure_present};
use crate::error::AppResult;

pub const MAX_NAME_LEN: usize = 200;
pub const MAX_BRAND_LEN: usize = 100;
pub const MAX_PERFUMER_LEN: usize = 100;

/// A catalog entry
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, FromRow)]
pub struct Perfume {
    pub id: Uuid,
    pub name: String,
    pub brand: String,
    pub perfumer: Option<String>,
    /// Specific scent ingredients, in catalog order
    pub notes: Vec<String>,
    /// Broad scent families
    pub accords: Vec<String>,
    /// Private perfumes are only visible to `created_by`
    pub is_private: bool,
    pub created_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Compact perfume representation embedded in recommendation responses
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PerfumeSummary {
    pub id: Uuid,
    pub name: String,
    pub brand: String,
    pub perfumer: Option<String>,
    pub notes: Vec<String>,
    pub accords: Vec<String>,
}

impl From<&Perfume> for PerfumeSummary {
    fn from(perfume: &Perfume) -> Self {
        Self {
            id: perfume.id,
            name: perfume.name.clone(),
            brand: perfume.brand.clone(),
            perfumer: perfume.perfumer.clone(),
            notes: perfume.notes.clone(),
            accords: perfume.accords.clone(),
        }
    }
}

/// An active collection membership joined with its perfume
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct CollectionEntry {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub perfume: Perfume,
    pub added_at: DateTime<Utc>,
}

/// Body of `POST /perfumes`
#[derive(Debug, Clone, Deserialize)]
pub struct CreatePerfumeRequest {
    pub name: String,
    pub brand: String,
    #[serde(default)]
    pub perfumer: Option<String>,
    #[serde(default)]
    pub notes: Vec<String>,
    #[serde(default)]
    pub accords: Vec<String>,
}

impl CreatePerfumeRequest {
    pub fn validate(&self) -> AppResult<()> {
        ensure_present("name", &self.name, MAX_NAME_LEN)?;
        ensure_present("brand", &self.brand, MAX_BRAND_LEN)?;
        if let Some(perfumer) = &self.perfumer {
            ensure_max_len("perfumer", perfumer, MAX_PERFUMER_LEN)?;
        }
        Ok(())
    }

    /// Trims free-text fields and drops blank tags
    pub fn normalized(self) -> Self {
        let clean_tags = |tags: Vec<String>| -> Vec<String> {
            tags.into_iter()
                .map(|t| t.trim().to_string())
                .filter(|t| !t.is_empty())
                .collect()
        };

        Self {
            name: self.name.trim().to_string(),
            brand: self.brand.trim().to_string(),
            perfumer: self
                .perfumer
                .map(|p| p.trim().to_string())
                .filter(|p| !p.is_empty()),
            notes: clean_tags(self.notes),
            accords: clean_tags(self.accords),
        }
    }
}

/// Query string of `GET /perfumes/search`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PerfumeSearchQuery {
    /// Matched against name or brand
    pub q: Option<String>,
    pub brand: Option<String>,
    /// Exact accord tag
    pub accord: Option<String>,
    pub limit: Option<i64>,
}

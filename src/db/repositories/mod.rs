//! One repository per table. Queries are checked at runtime (`query_as`) so
//! the crate builds without a live database.

pub mod collections;
pub mod perfumes;
pub mod recommendations;
pub mod users;

pub use collections::CollectionRepo;
pub use perfumes::PerfumeRepo;
pub use recommendations::{PgRecommendationStore, RecommendationRepo};
pub use users::UserRepo;

/// True when `err` is a Postgres unique-constraint violation
pub(crate) fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db_err) if db_err.is_unique_violation())
}

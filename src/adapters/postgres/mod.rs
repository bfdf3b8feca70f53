//! PostgreSQL adapters - Database implementations for repository ports.
//!
//! This module provides adapters for PostgreSQL-backed persistence:
//! - `PostgresCardRepository` - Cards and their JSON profile payload
//! - `PostgresAnalyticsStore` - View, save and interaction rows
//! - `PostgresSubscriptionRepository` - One subscription row per user
//!
//! The schema lives in `migrations/` and is applied by `run_migrations`.

mod analytics_store;
mod card_repository;
mod subscription_repository;

pub use analytics_store::PostgresAnalyticsStore;
pub use card_repository::PostgresCardRepository;
pub use subscription_repository::PostgresSubscriptionRepository;

use sqlx::PgPool;

use crate::domain::foundation::{DomainError, ErrorCode};

/// Applies the embedded migrations.
pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}

/// Maps a sqlx failure to a domain error.
///
/// Unique violations (23505) become `Conflict`; anything else is a
/// `DatabaseError` carrying the context.
pub(crate) fn db_error(context: &str, e: sqlx::Error) -> DomainError {
    if let Some(db) = e.as_database_error() {
        if db.is_unique_violation() {
            return DomainError::new(ErrorCode::Conflict, format!("{}: already exists", context));
        }
    }
    tracing::error!(error = %e, "{}", context);
    DomainError::new(ErrorCode::DatabaseError, format!("{}: {}", context, e))
}

pub(crate) fn is_foreign_key_violation(e: &sqlx::Error) -> bool {
    e.as_database_error()
        .map(|db| db.is_foreign_key_violation())
        .unwrap_or(false)
}

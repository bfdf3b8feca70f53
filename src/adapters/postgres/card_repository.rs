//! PostgreSQL implementation of CardRepository.
//!
//! The profile is stored verbatim in the `data` JSONB column so unknown
//! keys survive a round trip.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::types::Json;
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::card::{Card, CardProfile};
use crate::domain::foundation::{CardId, DomainError, ErrorCode, Timestamp, UserId};
use crate::ports::CardRepository;

use super::db_error;

const CARD_COLUMNS: &str =
    "id, user_id, name, data, is_template, views_count, created_at, updated_at";

/// PostgreSQL implementation of CardRepository.
#[derive(Clone)]
pub struct PostgresCardRepository {
    pool: PgPool,
}

impl PostgresCardRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Database row representation of a card.
#[derive(Debug, sqlx::FromRow)]
struct CardRow {
    id: Uuid,
    user_id: Uuid,
    name: String,
    data: Json<CardProfile>,
    is_template: bool,
    views_count: i64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<CardRow> for Card {
    fn from(row: CardRow) -> Self {
        Card {
            id: CardId::from_uuid(row.id),
            user_id: UserId::from_uuid(row.user_id),
            name: row.name,
            profile: row.data.0,
            is_template: row.is_template,
            views_count: row.views_count,
            created_at: Timestamp::from_datetime(row.created_at),
            updated_at: Timestamp::from_datetime(row.updated_at),
        }
    }
}

fn card_not_found(id: &CardId) -> DomainError {
    DomainError::new(ErrorCode::CardNotFound, format!("Card not found: {}", id))
}

#[async_trait]
impl CardRepository for PostgresCardRepository {
    async fn insert(&self, card: &Card) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO cards (
                id, user_id, name, data, is_template, views_count, created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(card.id.as_uuid())
        .bind(card.user_id.as_uuid())
        .bind(&card.name)
        .bind(Json(&card.profile))
        .bind(card.is_template)
        .bind(card.views_count)
        .bind(card.created_at.as_datetime())
        .bind(card.updated_at.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| db_error("Failed to insert card", e))?;

        Ok(())
    }

    async fn update(&self, card: &Card) -> Result<(), DomainError> {
        let result = sqlx::query(
            r#"
            UPDATE cards SET
                name = $2,
                data = $3,
                updated_at = $4
            WHERE id = $1
            "#,
        )
        .bind(card.id.as_uuid())
        .bind(&card.name)
        .bind(Json(&card.profile))
        .bind(card.updated_at.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| db_error("Failed to update card", e))?;

        if result.rows_affected() == 0 {
            return Err(card_not_found(&card.id));
        }

        Ok(())
    }

    async fn find_by_id(&self, id: &CardId) -> Result<Option<Card>, DomainError> {
        let row: Option<CardRow> =
            sqlx::query_as(&format!("SELECT {} FROM cards WHERE id = $1", CARD_COLUMNS))
                .bind(id.as_uuid())
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| db_error("Failed to fetch card", e))?;

        Ok(row.map(Card::from))
    }

    async fn list_by_user(&self, user_id: &UserId) -> Result<Vec<Card>, DomainError> {
        let rows: Vec<CardRow> = sqlx::query_as(&format!(
            "SELECT {} FROM cards WHERE user_id = $1 ORDER BY updated_at DESC",
            CARD_COLUMNS
        ))
        .bind(user_id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_error("Failed to list cards", e))?;

        Ok(rows.into_iter().map(Card::from).collect())
    }

    async fn list_templates(&self) -> Result<Vec<Card>, DomainError> {
        let rows: Vec<CardRow> = sqlx::query_as(&format!(
            "SELECT {} FROM cards WHERE is_template ORDER BY updated_at DESC",
            CARD_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_error("Failed to list templates", e))?;

        Ok(rows.into_iter().map(Card::from).collect())
    }

    async fn count_by_user(&self, user_id: &UserId) -> Result<u32, DomainError> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM cards WHERE user_id = $1")
            .bind(user_id.as_uuid())
            .fetch_one(&self.pool)
            .await
            .map_err(|e| db_error("Failed to count cards", e))?;

        Ok(u32::try_from(count).unwrap_or(u32::MAX))
    }

    async fn delete(&self, id: &CardId) -> Result<(), DomainError> {
        let result = sqlx::query("DELETE FROM cards WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(|e| db_error("Failed to delete card", e))?;

        if result.rows_affected() == 0 {
            return Err(card_not_found(id));
        }

        Ok(())
    }
}

//! PostgreSQL implementation of the analytics ports.
//!
//! Event rows reference `cards(id)`, so recording against an unknown card
//! fails the foreign key and is reported as `CardNotFound`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::types::Json;
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::analytics::{AnalyticsEvents, CardInteraction, CardView, ContactSave, DateRange};
use crate::domain::foundation::{CardId, DomainError, ErrorCode, EventId, Timestamp};
use crate::ports::{AnalyticsReader, AnalyticsRecorder};

use super::{db_error, is_foreign_key_violation};

/// PostgreSQL storage for analytics events.
#[derive(Clone)]
pub struct PostgresAnalyticsStore {
    pool: PgPool,
}

impl PostgresAnalyticsStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn card_not_found(id: &CardId) -> DomainError {
    DomainError::new(ErrorCode::CardNotFound, format!("Card not found: {}", id))
}

fn insert_error(context: &str, card_id: &CardId, e: sqlx::Error) -> DomainError {
    if is_foreign_key_violation(&e) {
        card_not_found(card_id)
    } else {
        db_error(context, e)
    }
}

#[derive(Debug, sqlx::FromRow)]
struct ViewRow {
    id: Uuid,
    card_id: Uuid,
    viewed_at: DateTime<Utc>,
    device_type: Option<String>,
    location: Option<String>,
    referrer: Option<String>,
}

#[derive(Debug, sqlx::FromRow)]
struct SaveRow {
    id: Uuid,
    card_id: Uuid,
    saved_at: DateTime<Utc>,
    device_type: Option<String>,
    location: Option<String>,
}

#[derive(Debug, sqlx::FromRow)]
struct InteractionRow {
    id: Uuid,
    card_id: Uuid,
    interaction_type: String,
    occurred_at: DateTime<Utc>,
    metadata: Json<serde_json::Value>,
}

#[async_trait]
impl AnalyticsRecorder for PostgresAnalyticsStore {
    async fn record_view(&self, view: &CardView) -> Result<(), DomainError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| db_error("Failed to begin transaction", e))?;

        let bumped = sqlx::query("UPDATE cards SET views_count = views_count + 1 WHERE id = $1")
            .bind(view.card_id.as_uuid())
            .execute(&mut *tx)
            .await
            .map_err(|e| db_error("Failed to increment view count", e))?;
        if bumped.rows_affected() == 0 {
            return Err(card_not_found(&view.card_id));
        }

        sqlx::query(
            r#"
            INSERT INTO card_views (id, card_id, viewed_at, device_type, location, referrer)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(view.id.as_uuid())
        .bind(view.card_id.as_uuid())
        .bind(view.viewed_at.as_datetime())
        .bind(&view.device_type)
        .bind(&view.location)
        .bind(&view.referrer)
        .execute(&mut *tx)
        .await
        .map_err(|e| insert_error("Failed to record view", &view.card_id, e))?;

        tx.commit()
            .await
            .map_err(|e| db_error("Failed to commit view", e))?;
        Ok(())
    }

    async fn record_save(&self, save: &ContactSave) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO contact_saves (id, card_id, saved_at, device_type, location)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(save.id.as_uuid())
        .bind(save.card_id.as_uuid())
        .bind(save.saved_at.as_datetime())
        .bind(&save.device_type)
        .bind(&save.location)
        .execute(&self.pool)
        .await
        .map_err(|e| insert_error("Failed to record save", &save.card_id, e))?;

        Ok(())
    }

    async fn record_interaction(&self, interaction: &CardInteraction) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO card_interactions (id, card_id, interaction_type, occurred_at, metadata)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(interaction.id.as_uuid())
        .bind(interaction.card_id.as_uuid())
        .bind(&interaction.interaction_type)
        .bind(interaction.occurred_at.as_datetime())
        .bind(Json(&interaction.metadata))
        .execute(&self.pool)
        .await
        .map_err(|e| insert_error("Failed to record interaction", &interaction.card_id, e))?;

        Ok(())
    }
}

#[async_trait]
impl AnalyticsReader for PostgresAnalyticsStore {
    async fn fetch_events(
        &self,
        card_ids: &[CardId],
        range: &DateRange,
    ) -> Result<AnalyticsEvents, DomainError> {
        if card_ids.is_empty() {
            return Ok(AnalyticsEvents::default());
        }

        let ids: Vec<Uuid> = card_ids.iter().map(|id| *id.as_uuid()).collect();
        let start = *range.start_timestamp().as_datetime();
        let end = *range.end_timestamp_exclusive().as_datetime();

        let views: Vec<ViewRow> = sqlx::query_as(
            r#"
            SELECT id, card_id, viewed_at, device_type, location, referrer
            FROM card_views
            WHERE card_id = ANY($1) AND viewed_at >= $2 AND viewed_at < $3
            ORDER BY viewed_at
            "#,
        )
        .bind(&ids)
        .bind(start)
        .bind(end)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_error("Failed to fetch views", e))?;

        let saves: Vec<SaveRow> = sqlx::query_as(
            r#"
            SELECT id, card_id, saved_at, device_type, location
            FROM contact_saves
            WHERE card_id = ANY($1) AND saved_at >= $2 AND saved_at < $3
            ORDER BY saved_at
            "#,
        )
        .bind(&ids)
        .bind(start)
        .bind(end)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_error("Failed to fetch saves", e))?;

        let interactions: Vec<InteractionRow> = sqlx::query_as(
            r#"
            SELECT id, card_id, interaction_type, occurred_at, metadata
            FROM card_interactions
            WHERE card_id = ANY($1) AND occurred_at >= $2 AND occurred_at < $3
            ORDER BY occurred_at
            "#,
        )
        .bind(&ids)
        .bind(start)
        .bind(end)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_error("Failed to fetch interactions", e))?;

        Ok(AnalyticsEvents {
            views: views
                .into_iter()
                .map(|r| CardView {
                    id: EventId::from_uuid(r.id),
                    card_id: CardId::from_uuid(r.card_id),
                    viewed_at: Timestamp::from_datetime(r.viewed_at),
                    device_type: r.device_type,
                    location: r.location,
                    referrer: r.referrer,
                })
                .collect(),
            saves: saves
                .into_iter()
                .map(|r| ContactSave {
                    id: EventId::from_uuid(r.id),
                    card_id: CardId::from_uuid(r.card_id),
                    saved_at: Timestamp::from_datetime(r.saved_at),
                    device_type: r.device_type,
                    location: r.location,
                })
                .collect(),
            interactions: interactions
                .into_iter()
                .map(|r| CardInteraction {
                    id: EventId::from_uuid(r.id),
                    card_id: CardId::from_uuid(r.card_id),
                    interaction_type: r.interaction_type,
                    occurred_at: Timestamp::from_datetime(r.occurred_at),
                    metadata: r.metadata.0,
                })
                .collect(),
        })
    }
}

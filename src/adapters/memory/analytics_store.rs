//! In-Memory Analytics Store
//!
//! Keeps event rows in memory and bumps view counters on the paired
//! in-memory card repository.

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::analytics::{AnalyticsEvents, CardInteraction, CardView, ContactSave, DateRange};
use crate::domain::foundation::{CardId, DomainError, ErrorCode, Timestamp};
use crate::ports::{AnalyticsReader, AnalyticsRecorder};

use super::InMemoryCardRepository;

/// In-memory storage for analytics events.
#[derive(Debug, Clone)]
pub struct InMemoryAnalyticsStore {
    cards: InMemoryCardRepository,
    events: Arc<RwLock<AnalyticsEvents>>,
}

impl InMemoryAnalyticsStore {
    pub fn new(cards: InMemoryCardRepository) -> Self {
        Self {
            cards,
            events: Arc::new(RwLock::new(AnalyticsEvents::default())),
        }
    }

    /// Inserts rows directly, bypassing card checks. For seeding fixtures.
    pub async fn seed(&self, events: AnalyticsEvents) {
        let mut stored = self.events.write().await;
        stored.views.extend(events.views);
        stored.saves.extend(events.saves);
        stored.interactions.extend(events.interactions);
    }

    /// Snapshot of everything recorded.
    pub async fn snapshot(&self) -> AnalyticsEvents {
        self.events.read().await.clone()
    }

    async fn ensure_card(&self, id: &CardId) -> Result<(), DomainError> {
        if self.cards.exists(id).await {
            Ok(())
        } else {
            Err(DomainError::new(ErrorCode::CardNotFound, "Card not found"))
        }
    }
}

#[async_trait]
impl AnalyticsRecorder for InMemoryAnalyticsStore {
    async fn record_view(&self, view: &CardView) -> Result<(), DomainError> {
        if !self.cards.increment_views(&view.card_id).await {
            return Err(DomainError::new(ErrorCode::CardNotFound, "Card not found"));
        }
        self.events.write().await.views.push(view.clone());
        Ok(())
    }

    async fn record_save(&self, save: &ContactSave) -> Result<(), DomainError> {
        self.ensure_card(&save.card_id).await?;
        self.events.write().await.saves.push(save.clone());
        Ok(())
    }

    async fn record_interaction(&self, interaction: &CardInteraction) -> Result<(), DomainError> {
        self.ensure_card(&interaction.card_id).await?;
        self.events.write().await.interactions.push(interaction.clone());
        Ok(())
    }
}

#[async_trait]
impl AnalyticsReader for InMemoryAnalyticsStore {
    async fn fetch_events(&self, card_ids: &[CardId], range: &DateRange) -> Result<AnalyticsEvents, DomainError> {
        let start = range.start_timestamp();
        let end = range.end_timestamp_exclusive();
        let in_scope = |card: &CardId, at: &Timestamp| card_ids.contains(card) && start <= *at && at.is_before(&end);

        let events = self.events.read().await;
        Ok(AnalyticsEvents {
            views: events
                .views
                .iter()
                .filter(|v| in_scope(&v.card_id, &v.viewed_at))
                .cloned()
                .collect(),
            saves: events
                .saves
                .iter()
                .filter(|s| in_scope(&s.card_id, &s.saved_at))
                .cloned()
                .collect(),
            interactions: events
                .interactions
                .iter()
                .filter(|i| in_scope(&i.card_id, &i.occurred_at))
                .cloned()
                .collect(),
        })
    }
}

//! In-Memory Card Repository
//!
//! Stores cards in memory for handler and router tests.

use async_trait::async_trait;
use std::cmp::Reverse;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::card::Card;
use crate::domain::foundation::{CardId, DomainError, ErrorCode, UserId};
use crate::ports::CardRepository;

/// In-memory storage for cards.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCardRepository {
    cards: Arc<RwLock<HashMap<CardId, Card>>>,
}

impl InMemoryCardRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds the repository with existing cards.
    pub async fn with_cards(cards: impl IntoIterator<Item = Card>) -> Self {
        let repo = Self::new();
        {
            let mut stored = repo.cards.write().await;
            for card in cards {
                stored.insert(card.id, card);
            }
        }
        repo
    }

    /// Number of stored cards.
    pub async fn len(&self) -> usize {
        self.cards.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.cards.read().await.is_empty()
    }

    /// Increments `views_count`, returning false for unknown cards.
    pub async fn increment_views(&self, id: &CardId) -> bool {
        match self.cards.write().await.get_mut(id) {
            Some(card) => {
                card.views_count += 1;
                true
            }
            None => false,
        }
    }

    pub async fn exists(&self, id: &CardId) -> bool {
        self.cards.read().await.contains_key(id)
    }
}

fn newest_first(mut cards: Vec<Card>) -> Vec<Card> {
    cards.sort_by_key(|c| Reverse(c.updated_at));
    cards
}

fn not_found(id: &CardId) -> DomainError {
    DomainError::new(ErrorCode::CardNotFound, "Card not found").with_detail("card_id", id.to_string())
}

#[async_trait]
impl CardRepository for InMemoryCardRepository {
    async fn insert(&self, card: &Card) -> Result<(), DomainError> {
        let mut cards = self.cards.write().await;
        if cards.contains_key(&card.id) {
            return Err(DomainError::new(ErrorCode::Conflict, "Card already exists"));
        }
        cards.insert(card.id, card.clone());
        Ok(())
    }

    async fn update(&self, card: &Card) -> Result<(), DomainError> {
        let mut cards = self.cards.write().await;
        let stored = cards.get_mut(&card.id).ok_or_else(|| not_found(&card.id))?;
        stored.name = card.name.clone();
        stored.profile = card.profile.clone();
        stored.updated_at = card.updated_at;
        Ok(())
    }

    async fn find_by_id(&self, id: &CardId) -> Result<Option<Card>, DomainError> {
        Ok(self.cards.read().await.get(id).cloned())
    }

    async fn list_by_user(&self, user_id: &UserId) -> Result<Vec<Card>, DomainError> {
        let cards = self.cards.read().await;
        Ok(newest_first(
            cards.values().filter(|c| c.is_owned_by(user_id)).cloned().collect(),
        ))
    }

    async fn list_templates(&self) -> Result<Vec<Card>, DomainError> {
        let cards = self.cards.read().await;
        Ok(newest_first(
            cards.values().filter(|c| c.is_template).cloned().collect(),
        ))
    }

    async fn count_by_user(&self, user_id: &UserId) -> Result<u32, DomainError> {
        let cards = self.cards.read().await;
        Ok(cards.values().filter(|c| c.is_owned_by(user_id)).count() as u32)
    }

    async fn delete(&self, id: &CardId) -> Result<(), DomainError> {
        self.cards
            .write()
            .await
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| not_found(id))
    }
}

//! GetPublicCardHandler - Query handler for unauthenticated card reads.

use std::sync::Arc;

use crate::domain::card::Card;
use crate::domain::foundation::{CardId, DomainError};
use crate::ports::CardRepository;

use super::load_card;

/// Query to get a card by its public id.
#[derive(Debug, Clone)]
pub struct GetPublicCardQuery {
    pub card_id: CardId,
}

/// Handler for public card reads.
///
/// Recording the view is left to the client's tracking call so that
/// editor previews are not counted.
pub struct GetPublicCardHandler {
    cards: Arc<dyn CardRepository>,
}

impl GetPublicCardHandler {
    pub fn new(cards: Arc<dyn CardRepository>) -> Self {
        Self { cards }
    }

    pub async fn handle(&self, query: GetPublicCardQuery) -> Result<Card, DomainError> {
        load_card(self.cards.as_ref(), &query.card_id).await
    }
}

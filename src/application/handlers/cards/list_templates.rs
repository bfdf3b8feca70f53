//! ListTemplatesHandler - Query handler for template cards.

use std::sync::Arc;

use crate::domain::card::Card;
use crate::domain::foundation::DomainError;
use crate::ports::CardRepository;

/// Handler listing every card flagged as a template.
pub struct ListTemplatesHandler {
    cards: Arc<dyn CardRepository>,
}

impl ListTemplatesHandler {
    pub fn new(cards: Arc<dyn CardRepository>) -> Self {
        Self { cards }
    }

    pub async fn handle(&self) -> Result<Vec<Card>, DomainError> {
        self.cards.list_templates().await
    }
}

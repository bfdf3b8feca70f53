//! DeleteCardHandler - Command handler for deleting a card.

use std::sync::Arc;

use crate::domain::foundation::{CardId, DomainError, UserId};
use crate::ports::CardRepository;

use super::load_owned_card;

/// Command to delete a card.
#[derive(Debug, Clone)]
pub struct DeleteCardCommand {
    pub card_id: CardId,
    pub user_id: UserId,
}

/// Handler for deleting owned cards. Event rows go with the card.
pub struct DeleteCardHandler {
    cards: Arc<dyn CardRepository>,
}

impl DeleteCardHandler {
    pub fn new(cards: Arc<dyn CardRepository>) -> Self {
        Self { cards }
    }

    pub async fn handle(&self, cmd: DeleteCardCommand) -> Result<(), DomainError> {
        load_owned_card(self.cards.as_ref(), &cmd.card_id, &cmd.user_id).await?;
        self.cards.delete(&cmd.card_id).await?;

        tracing::info!(card_id = %cmd.card_id, user_id = %cmd.user_id, "card deleted");
        Ok(())
    }
}

//! SaveCardHandler - Command handler for the editor's save action.
//!
//! Updates the card when an id is given, otherwise creates one.

use std::sync::Arc;

use crate::domain::card::{Card, CardProfile};
use crate::domain::foundation::{CardId, DomainError, UserId};
use crate::ports::{CardRepository, SubscriptionRepository};

use super::{load_owned_card, CreateCardCommand, CreateCardHandler};

/// Command to save a card.
#[derive(Debug, Clone)]
pub struct SaveCardCommand {
    pub user_id: UserId,
    /// Existing card to update; `None` creates a new card.
    pub card_id: Option<CardId>,
    pub name: String,
    pub profile: CardProfile,
}

/// Result of a save.
#[derive(Debug, Clone)]
pub struct SaveCardResult {
    pub card: Card,
    /// True when the save created a new card.
    pub created: bool,
}

/// Handler for saving cards.
pub struct SaveCardHandler {
    cards: Arc<dyn CardRepository>,
    create: CreateCardHandler,
}

impl SaveCardHandler {
    pub fn new(cards: Arc<dyn CardRepository>, subscriptions: Arc<dyn SubscriptionRepository>) -> Self {
        Self {
            create: CreateCardHandler::new(cards.clone(), subscriptions),
            cards,
        }
    }

    pub async fn handle(&self, cmd: SaveCardCommand) -> Result<SaveCardResult, DomainError> {
        let Some(card_id) = cmd.card_id else {
            let card = self
                .create
                .handle(CreateCardCommand {
                    user_id: cmd.user_id,
                    name: cmd.name,
                    profile: cmd.profile,
                    is_template: false,
                })
                .await?;
            return Ok(SaveCardResult { card, created: true });
        };

        let mut card = load_owned_card(self.cards.as_ref(), &card_id, &cmd.user_id).await?;
        card.update(&cmd.name, cmd.profile)?;
        self.cards.update(&card).await?;

        tracing::info!(card_id = %card.id, "card updated");
        Ok(SaveCardResult { card, created: false })
    }
}

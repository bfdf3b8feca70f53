//! CreateCardHandler - Command handler for creating a card.

use std::sync::Arc;

use crate::application::handlers::subscription::current_subscription;
use crate::domain::card::{Card, CardProfile};
use crate::domain::foundation::{DomainError, ErrorCode, UserId};
use crate::ports::{CardRepository, SubscriptionRepository};

/// Command to create a card.
#[derive(Debug, Clone)]
pub struct CreateCardCommand {
    pub user_id: UserId,
    pub name: String,
    pub profile: CardProfile,
    pub is_template: bool,
}

/// Handler for creating cards.
///
/// Validates the card, then checks the owner's effective plan still allows
/// another card before persisting.
pub struct CreateCardHandler {
    cards: Arc<dyn CardRepository>,
    subscriptions: Arc<dyn SubscriptionRepository>,
}

impl CreateCardHandler {
    pub fn new(cards: Arc<dyn CardRepository>, subscriptions: Arc<dyn SubscriptionRepository>) -> Self {
        Self { cards, subscriptions }
    }

    pub async fn handle(&self, cmd: CreateCardCommand) -> Result<Card, DomainError> {
        let card = Card::create(cmd.user_id, &cmd.name, cmd.profile, cmd.is_template)?;

        let limits = current_subscription(self.subscriptions.as_ref(), &cmd.user_id)
            .await?
            .limits();
        let existing = self.cards.count_by_user(&cmd.user_id).await?;
        if limits.card_limit_reached(existing) {
            let max = limits.max_cards.unwrap_or_default();
            return Err(DomainError::new(
                ErrorCode::PlanLimitReached,
                format!("Your {} plan allows {} card(s)", limits.plan.display_name(), max),
            )
            .with_detail("plan", limits.plan.as_str())
            .with_detail("max_cards", max.to_string()));
        }

        self.cards.insert(&card).await?;

        tracing::info!(card_id = %card.id, user_id = %cmd.user_id, "card created");
        Ok(card)
    }
}

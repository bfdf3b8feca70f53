//! GetCardHandler - Query handler for an owner's read of a card.

use std::sync::Arc;

use crate::domain::card::Card;
use crate::domain::foundation::{CardId, DomainError, UserId};
use crate::ports::CardRepository;

use super::load_owned_card;

/// Query to get a card for editing.
#[derive(Debug, Clone)]
pub struct GetCardQuery {
    pub card_id: CardId,
    /// User ID for authorization.
    pub user_id: UserId,
}

/// Handler for reading an owned card.
pub struct GetCardHandler {
    cards: Arc<dyn CardRepository>,
}

impl GetCardHandler {
    pub fn new(cards: Arc<dyn CardRepository>) -> Self {
        Self { cards }
    }

    pub async fn handle(&self, query: GetCardQuery) -> Result<Card, DomainError> {
        load_owned_card(self.cards.as_ref(), &query.card_id, &query.user_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::test_support::{user, Stores};
    use crate::domain::foundation::ErrorCode;

    #[tokio::test]
    async fn owner_can_read_card() {
        let stores = Stores::new();
        let owner = user();
        let card = stores.add_card(owner, "Mine").await;

        let found = GetCardHandler::new(stores.cards())
            .handle(GetCardQuery { card_id: card.id, user_id: owner })
            .await
            .unwrap();
        assert_eq!(found, card);
    }

    #[tokio::test]
    async fn other_users_are_forbidden() {
        let stores = Stores::new();
        let card = stores.add_card(user(), "Theirs").await;

        let err = GetCardHandler::new(stores.cards())
            .handle(GetCardQuery { card_id: card.id, user_id: user() })
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::Forbidden);
    }

    #[tokio::test]
    async fn unknown_card_is_not_found() {
        let stores = Stores::new();
        let err = GetCardHandler::new(stores.cards())
            .handle(GetCardQuery { card_id: CardId::new(), user_id: user() })
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::CardNotFound);
    }
}

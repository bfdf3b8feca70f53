//! ListCardsHandler - Query handler for a user's cards.

use std::sync::Arc;

use crate::domain::card::Card;
use crate::domain::foundation::{DomainError, UserId};
use crate::ports::CardRepository;

/// Query to list the user's cards.
#[derive(Debug, Clone)]
pub struct ListCardsQuery {
    pub user_id: UserId,
}

/// Handler listing cards, most recently updated first.
pub struct ListCardsHandler {
    cards: Arc<dyn CardRepository>,
}

impl ListCardsHandler {
    pub fn new(cards: Arc<dyn CardRepository>) -> Self {
        Self { cards }
    }

    pub async fn handle(&self, query: ListCardsQuery) -> Result<Vec<Card>, DomainError> {
        self.cards.list_by_user(&query.user_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::test_support::{user, Stores};

    #[tokio::test]
    async fn lists_only_own_cards() {
        let stores = Stores::new();
        let owner = user();
        stores.add_card(owner, "One").await;
        stores.add_card(owner, "Two").await;
        stores.add_card(user(), "Other").await;

        let cards = ListCardsHandler::new(stores.cards())
            .handle(ListCardsQuery { user_id: owner })
            .await
            .unwrap();
        assert_eq!(cards.len(), 2);
        assert!(cards.iter().all(|c| c.user_id == owner));
    }

    #[tokio::test]
    async fn empty_for_new_user() {
        let stores = Stores::new();
        let cards = ListCardsHandler::new(stores.cards())
            .handle(ListCardsQuery { user_id: user() })
            .await
            .unwrap();
        assert!(cards.is_empty());
    }
}

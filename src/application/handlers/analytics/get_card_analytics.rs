//! GetCardAnalyticsHandler - Query handler for a single card's analytics.

use std::sync::Arc;

use crate::domain::analytics::{aggregate, AnalyticsSummary, CardRef, DateRange};
use crate::domain::foundation::{CardId, DomainError, UserId};
use crate::ports::{AnalyticsReader, CardRepository};

use super::super::cards::load_owned_card;

/// Query for one card's analytics.
#[derive(Debug, Clone)]
pub struct GetCardAnalyticsQuery {
    pub card_id: CardId,
    /// User ID for authorization.
    pub user_id: UserId,
    pub range: DateRange,
}

/// Handler for per-card analytics. Only the owner may read them.
pub struct GetCardAnalyticsHandler {
    cards: Arc<dyn CardRepository>,
    reader: Arc<dyn AnalyticsReader>,
}

impl GetCardAnalyticsHandler {
    pub fn new(cards: Arc<dyn CardRepository>, reader: Arc<dyn AnalyticsReader>) -> Self {
        Self { cards, reader }
    }

    pub async fn handle(&self, query: GetCardAnalyticsQuery) -> Result<AnalyticsSummary, DomainError> {
        let card = load_owned_card(self.cards.as_ref(), &query.card_id, &query.user_id).await?;
        let cards = [CardRef::from(&card)];

        let events = self.reader.fetch_events(&[card.id], &query.range).await?;
        Ok(aggregate(&cards, &events, &query.range))
    }
}

//! GetDashboardAnalyticsHandler - Query handler for the analytics dashboard.
//!
//! Aggregates events across every card the user owns.

use std::sync::Arc;

use crate::domain::analytics::{aggregate, AnalyticsSummary, CardRef, DateRange};
use crate::domain::foundation::{CardId, DomainError, UserId};
use crate::ports::{AnalyticsReader, CardRepository};

/// Query for the user's dashboard analytics.
#[derive(Debug, Clone)]
pub struct GetDashboardAnalyticsQuery {
    pub user_id: UserId,
    pub range: DateRange,
}

/// Handler for dashboard analytics.
pub struct GetDashboardAnalyticsHandler {
    cards: Arc<dyn CardRepository>,
    reader: Arc<dyn AnalyticsReader>,
}

impl GetDashboardAnalyticsHandler {
    pub fn new(cards: Arc<dyn CardRepository>, reader: Arc<dyn AnalyticsReader>) -> Self {
        Self { cards, reader }
    }

    pub async fn handle(&self, query: GetDashboardAnalyticsQuery) -> Result<AnalyticsSummary, DomainError> {
        let cards: Vec<CardRef> = self
            .cards
            .list_by_user(&query.user_id)
            .await?
            .iter()
            .map(CardRef::from)
            .collect();
        let ids: Vec<CardId> = cards.iter().map(|c| c.id).collect();

        let events = self.reader.fetch_events(&ids, &query.range).await?;
        Ok(aggregate(&cards, &events, &query.range))
    }
}

//! GetSubscriptionHandler - Query handler for the billing page.

use std::sync::Arc;

use serde::Serialize;

use crate::domain::foundation::{DomainError, UserId};
use crate::domain::subscription::{PlanId, PlanLimits, Subscription};
use crate::ports::{CardRepository, SubscriptionRepository};

use super::current_subscription;

/// Query for the user's subscription.
#[derive(Debug, Clone)]
pub struct GetSubscriptionQuery {
    pub user_id: UserId,
}

/// Subscription with the limits it grants and current usage.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionOverview {
    pub subscription: Subscription,
    pub effective_plan: PlanId,
    pub limits: PlanLimits,
    pub card_count: u32,
}

/// Handler for reading the current subscription.
pub struct GetSubscriptionHandler {
    subscriptions: Arc<dyn SubscriptionRepository>,
    cards: Arc<dyn CardRepository>,
}

impl GetSubscriptionHandler {
    pub fn new(subscriptions: Arc<dyn SubscriptionRepository>, cards: Arc<dyn CardRepository>) -> Self {
        Self { subscriptions, cards }
    }

    pub async fn handle(&self, query: GetSubscriptionQuery) -> Result<SubscriptionOverview, DomainError> {
        let subscription = current_subscription(self.subscriptions.as_ref(), &query.user_id).await?;
        let card_count = self.cards.count_by_user(&query.user_id).await?;
        Ok(SubscriptionOverview {
            effective_plan: subscription.effective_plan(),
            limits: subscription.limits(),
            subscription,
            card_count,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::test_support::{user, Stores};
    use crate::domain::subscription::SubscriptionStatus;

    #[tokio::test]
    async fn user_without_row_is_on_free_plan() {
        let stores = Stores::new();
        let owner = user();
        stores.add_card(owner, "Only").await;

        let overview = GetSubscriptionHandler::new(stores.subscriptions(), stores.cards())
            .handle(GetSubscriptionQuery { user_id: owner })
            .await
            .unwrap();

        assert_eq!(overview.effective_plan, PlanId::Free);
        assert_eq!(overview.limits.max_cards, Some(1));
        assert_eq!(overview.card_count, 1);
        assert_eq!(overview.subscription.status, SubscriptionStatus::Active);
    }

    #[tokio::test]
    async fn paid_subscription_is_reported() {
        let stores = Stores::new();
        let owner = user();
        stores.subscribe(owner, PlanId::Business).await;

        let overview = GetSubscriptionHandler::new(stores.subscriptions(), stores.cards())
            .handle(GetSubscriptionQuery { user_id: owner })
            .await
            .unwrap();

        assert_eq!(overview.effective_plan, PlanId::Business);
        assert_eq!(overview.limits.max_cards, None);
        assert!(overview.limits.wallet_passes);
    }
}

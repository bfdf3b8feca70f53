//! In-Memory Subscription Repository

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::foundation::{DomainError, ErrorCode, UserId};
use crate::domain::subscription::Subscription;
use crate::ports::SubscriptionRepository;

/// In-memory storage for subscriptions, keyed by user.
#[derive(Debug, Clone, Default)]
pub struct InMemorySubscriptionRepository {
    subscriptions: Arc<RwLock<HashMap<UserId, Subscription>>>,
}

impl InMemorySubscriptionRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn with_subscription(subscription: Subscription) -> Self {
        let repo = Self::new();
        repo.subscriptions
            .write()
            .await
            .insert(subscription.user_id, subscription);
        repo
    }

    async fn find_where(&self, predicate: impl Fn(&Subscription) -> bool) -> Option<Subscription> {
        self.subscriptions
            .read()
            .await
            .values()
            .find(|s| predicate(s))
            .cloned()
    }
}

#[async_trait]
impl SubscriptionRepository for InMemorySubscriptionRepository {
    async fn find_by_user(&self, user_id: &UserId) -> Result<Option<Subscription>, DomainError> {
        Ok(self.subscriptions.read().await.get(user_id).cloned())
    }

    async fn find_by_stripe_subscription_id(&self, subscription_id: &str) -> Result<Option<Subscription>, DomainError> {
        Ok(self
            .find_where(|s| s.stripe_subscription_id.as_deref() == Some(subscription_id))
            .await)
    }

    async fn find_by_stripe_customer_id(&self, customer_id: &str) -> Result<Option<Subscription>, DomainError> {
        Ok(self
            .find_where(|s| s.stripe_customer_id.as_deref() == Some(customer_id))
            .await)
    }

    async fn upsert(&self, subscription: &Subscription) -> Result<(), DomainError> {
        let mut subscriptions = self.subscriptions.write().await;
        let clash = subscriptions.values().any(|s| {
            s.user_id != subscription.user_id
                && subscription.stripe_subscription_id.is_some()
                && s.stripe_subscription_id == subscription.stripe_subscription_id
        });
        if clash {
            return Err(DomainError::new(
                ErrorCode::Conflict,
                "Subscription already belongs to another user",
            ));
        }
        subscriptions.insert(subscription.user_id, subscription.clone());
        Ok(())
    }
}

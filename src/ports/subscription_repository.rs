//! Subscription repository port.
//!
//! Each user has at most one row; `upsert` keys on `user_id`. Webhooks look
//! rows up by provider ids because provider events do not carry our ids.

use crate::domain::foundation::{DomainError, UserId};
use crate::domain::subscription::Subscription;
use async_trait::async_trait;

/// Repository port for Subscription aggregate persistence.
#[async_trait]
pub trait SubscriptionRepository: Send + Sync {
    /// Find the subscription of a user. `None` means the free plan.
    async fn find_by_user(&self, user_id: &UserId) -> Result<Option<Subscription>, DomainError>;

    /// Find by the provider's subscription id.
    async fn find_by_stripe_subscription_id(
        &self,
        subscription_id: &str,
    ) -> Result<Option<Subscription>, DomainError>;

    /// Find by the provider's customer id.
    async fn find_by_stripe_customer_id(
        &self,
        customer_id: &str,
    ) -> Result<Option<Subscription>, DomainError>;

    /// Insert or replace the subscription of `subscription.user_id`.
    ///
    /// # Errors
    ///
    /// - `Conflict` if another user's row holds the same provider ids
    /// - `DatabaseError` on persistence failure
    async fn upsert(&self, subscription: &Subscription) -> Result<(), DomainError>;
}

//! Subscription aggregate entity.
//!
//! One row per user, created by the first completed checkout and kept in
//! sync by payment-provider webhooks. Users without a row are on the free
//! plan.
//!
//! # Design Decisions
//!
//! - **Implicit free tier**: A missing row means `free`, not "no access"
//! - **Provider is the source of truth**: Status changes are applied as
//!   reported, without a local state machine

use crate::domain::foundation::{SubscriptionId, Timestamp, UserId};
use serde::{Deserialize, Serialize};

use super::{PlanId, PlanLimits, SubscriptionStatus};

/// Subscription aggregate - a user's paid plan.
///
/// # Invariants
///
/// - `user_id` is unique (one subscription per user)
/// - `quantity >= 1`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subscription {
    pub id: SubscriptionId,
    pub user_id: UserId,
    pub plan: PlanId,
    pub status: SubscriptionStatus,
    pub stripe_customer_id: Option<String>,
    pub stripe_subscription_id: Option<String>,
    pub current_period_end: Option<Timestamp>,
    /// Seats purchased (business plan).
    pub quantity: u32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Provider-reported state applied by `Subscription::sync`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubscriptionSync {
    pub status: SubscriptionStatus,
    /// Plan resolved from the provider's price, if recognised.
    pub plan: Option<PlanId>,
    pub current_period_end: Option<Timestamp>,
    pub quantity: Option<u32>,
}

impl Subscription {
    /// Implicit free subscription for users without a row. Not persisted.
    pub fn free(user_id: UserId) -> Self {
        let now = Timestamp::now();
        Self {
            id: SubscriptionId::new(),
            user_id,
            plan: PlanId::Free,
            status: SubscriptionStatus::Active,
            stripe_customer_id: None,
            stripe_subscription_id: None,
            current_period_end: None,
            quantity: 1,
            created_at: now,
            updated_at: now,
        }
    }

    /// Creates an active subscription from a completed checkout.
    pub fn from_checkout(
        user_id: UserId,
        plan: PlanId,
        stripe_customer_id: Option<String>,
        stripe_subscription_id: Option<String>,
    ) -> Self {
        let mut subscription = Self::free(user_id);
        subscription.apply_checkout(plan, stripe_customer_id, stripe_subscription_id);
        subscription
    }

    /// Records a completed checkout on an existing subscription.
    pub fn apply_checkout(
        &mut self,
        plan: PlanId,
        stripe_customer_id: Option<String>,
        stripe_subscription_id: Option<String>,
    ) {
        self.plan = plan;
        self.status = SubscriptionStatus::Active;
        if stripe_customer_id.is_some() {
            self.stripe_customer_id = stripe_customer_id;
        }
        if stripe_subscription_id.is_some() {
            self.stripe_subscription_id = stripe_subscription_id;
        }
        self.updated_at = Timestamp::now();
    }

    /// Applies provider-reported state.
    pub fn sync(&mut self, update: SubscriptionSync) {
        self.status = update.status;
        if let Some(plan) = update.plan {
            self.plan = plan;
        }
        if update.current_period_end.is_some() {
            self.current_period_end = update.current_period_end;
        }
        if let Some(quantity) = update.quantity {
            self.quantity = quantity.max(1);
        }
        self.updated_at = Timestamp::now();
    }

    /// Sets the status alone (cancellation, invoice outcomes).
    pub fn set_status(&mut self, status: SubscriptionStatus) {
        self.status = status;
        self.updated_at = Timestamp::now();
    }

    /// Plan the user is entitled to right now.
    pub fn effective_plan(&self) -> PlanId {
        if self.status.grants_plan() {
            self.plan
        } else {
            PlanId::Free
        }
    }

    pub fn limits(&self) -> PlanLimits {
        self.effective_plan().limits()
    }

    /// Returns true if the provider knows this user as a customer.
    pub fn has_customer(&self) -> bool {
        self.stripe_customer_id.is_some()
    }
}

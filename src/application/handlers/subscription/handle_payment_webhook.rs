//! HandlePaymentWebhookHandler - Command handler for processing payment provider webhooks.

use std::sync::Arc;

use crate::domain::foundation::{DomainError, Timestamp, UserId};
use crate::domain::subscription::{PlanId, Subscription, SubscriptionStatus, SubscriptionSync};
use crate::ports::{PaymentProvider, SubscriptionRepository, WebhookEvent, WebhookEventKind};

use super::current_subscription;

/// Command to handle a payment webhook.
#[derive(Debug, Clone)]
pub struct HandlePaymentWebhookCommand {
    /// Raw webhook payload.
    pub payload: Vec<u8>,
    /// Webhook signature header.
    pub signature: String,
}

/// Result of webhook processing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HandlePaymentWebhookResult {
    /// A subscription row was written.
    SubscriptionUpdated {
        user_id: UserId,
        plan: PlanId,
        status: SubscriptionStatus,
    },
    /// Event acknowledged but no action taken.
    Ignored,
}

/// Handler for processing payment provider webhooks.
///
/// Every verified event is acknowledged. Events that cannot be matched to a
/// user are logged and ignored so the provider does not retry them.
pub struct HandlePaymentWebhookHandler {
    subscriptions: Arc<dyn SubscriptionRepository>,
    payment_provider: Arc<dyn PaymentProvider>,
}

impl HandlePaymentWebhookHandler {
    pub fn new(
        subscriptions: Arc<dyn SubscriptionRepository>,
        payment_provider: Arc<dyn PaymentProvider>,
    ) -> Self {
        Self {
            subscriptions,
            payment_provider,
        }
    }

    pub async fn handle(
        &self,
        cmd: HandlePaymentWebhookCommand,
    ) -> Result<HandlePaymentWebhookResult, DomainError> {
        let event = self
            .payment_provider
            .verify_webhook(&cmd.payload, &cmd.signature)
            .await?;

        tracing::info!(event_id = %event.id, event_type = %event.event_type, "payment webhook received");

        let WebhookEvent { id, event_type, kind } = event;
        let updated = match kind {
            WebhookEventKind::CheckoutCompleted {
                user_id,
                plan,
                customer_id,
                subscription_id,
            } => {
                self.checkout_completed(user_id.as_deref(), plan, customer_id, subscription_id)
                    .await?
            }
            WebhookEventKind::SubscriptionChanged {
                subscription_id,
                customer_id,
                status,
                plan,
                quantity,
                current_period_end,
                user_id,
            } => {
                let Some(mut subscription) = self
                    .locate(Some(&subscription_id), &customer_id, user_id.as_deref())
                    .await?
                else {
                    return Ok(ignored(&id, &event_type, "no matching subscription"));
                };
                let Some(status) = status else {
                    return Ok(ignored(&id, &event_type, "unknown subscription status"));
                };
                subscription.sync(SubscriptionSync {
                    status,
                    plan,
                    current_period_end: current_period_end.and_then(Timestamp::from_unix_secs),
                    quantity,
                });
                subscription.stripe_subscription_id = Some(subscription_id);
                subscription.stripe_customer_id = Some(customer_id);
                Some(subscription)
            }
            WebhookEventKind::SubscriptionDeleted {
                subscription_id,
                customer_id,
            } => {
                self.set_status(Some(&subscription_id), &customer_id, SubscriptionStatus::Canceled)
                    .await?
            }
            WebhookEventKind::InvoicePaymentFailed {
                customer_id,
                subscription_id,
            } => {
                self.set_status(subscription_id.as_deref(), &customer_id, SubscriptionStatus::PastDue)
                    .await?
            }
            WebhookEventKind::InvoicePaid {
                customer_id,
                subscription_id,
            } => {
                self.set_status(subscription_id.as_deref(), &customer_id, SubscriptionStatus::Active)
                    .await?
            }
            WebhookEventKind::Other => return Ok(HandlePaymentWebhookResult::Ignored),
        };

        let Some(subscription) = updated else {
            return Ok(ignored(&id, &event_type, "no matching subscription"));
        };

        self.subscriptions.upsert(&subscription).await?;
        tracing::info!(
            event_id = %id,
            user_id = %subscription.user_id,
            plan = %subscription.plan,
            status = subscription.status.as_str(),
            "subscription updated from webhook"
        );

        Ok(HandlePaymentWebhookResult::SubscriptionUpdated {
            user_id: subscription.user_id,
            plan: subscription.plan,
            status: subscription.status,
        })
    }

    async fn checkout_completed(
        &self,
        user_id: Option<&str>,
        plan: Option<PlanId>,
        customer_id: Option<String>,
        subscription_id: Option<String>,
    ) -> Result<Option<Subscription>, DomainError> {
        let (Some(user_id), Some(plan)) = (user_id.and_then(|u| UserId::new(u).ok()), plan) else {
            return Ok(None);
        };
        let mut subscription = current_subscription(self.subscriptions.as_ref(), &user_id).await?;
        subscription.apply_checkout(plan, customer_id, subscription_id);
        Ok(Some(subscription))
    }

    /// Finds the row a provider event refers to: by subscription id, then
    /// customer id, then the user id carried in metadata.
    async fn locate(
        &self,
        subscription_id: Option<&str>,
        customer_id: &str,
        user_id: Option<&str>,
    ) -> Result<Option<Subscription>, DomainError> {
        if let Some(subscription_id) = subscription_id {
            if let Some(found) = self
                .subscriptions
                .find_by_stripe_subscription_id(subscription_id)
                .await?
            {
                return Ok(Some(found));
            }
        }
        if let Some(found) = self.subscriptions.find_by_stripe_customer_id(customer_id).await? {
            return Ok(Some(found));
        }
        match user_id.and_then(|u| UserId::new(u).ok()) {
            Some(user_id) => current_subscription(self.subscriptions.as_ref(), &user_id)
                .await
                .map(Some),
            None => Ok(None),
        }
    }

    async fn set_status(
        &self,
        subscription_id: Option<&str>,
        customer_id: &str,
        status: SubscriptionStatus,
    ) -> Result<Option<Subscription>, DomainError> {
        let found = self.locate(subscription_id, customer_id, None).await?;
        Ok(found.map(|mut subscription| {
            subscription.set_status(status);
            subscription
        }))
    }
}

fn ignored(event_id: &str, event_type: &str, reason: &str) -> HandlePaymentWebhookResult {
    tracing::warn!(event_id, event_type, reason, "payment webhook ignored");
    HandlePaymentWebhookResult::Ignored
}

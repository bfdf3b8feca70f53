//! CreateCheckoutSessionHandler - Command handler for starting a paid plan checkout.

use std::sync::Arc;

use crate::domain::foundation::{DomainError, UserId, ValidationError};
use crate::domain::subscription::PlanId;
use crate::ports::{CheckoutSession, CreateCheckoutRequest, PaymentProvider, SubscriptionRepository};

/// Largest seat count accepted for a business checkout.
pub const MAX_SEATS: u32 = 100;

/// Command to start a checkout.
#[derive(Debug, Clone)]
pub struct CreateCheckoutSessionCommand {
    pub user_id: UserId,
    pub email: Option<String>,
    pub plan: PlanId,
    /// Seats; defaults to 1. Only business plans take more than one.
    pub quantity: Option<u32>,
    pub success_url: String,
    pub cancel_url: String,
}

/// Handler for starting hosted checkouts.
///
/// The subscription row is written by the webhook once the checkout
/// completes; nothing is persisted here.
pub struct CreateCheckoutSessionHandler {
    subscriptions: Arc<dyn SubscriptionRepository>,
    payment_provider: Arc<dyn PaymentProvider>,
}

impl CreateCheckoutSessionHandler {
    pub fn new(
        subscriptions: Arc<dyn SubscriptionRepository>,
        payment_provider: Arc<dyn PaymentProvider>,
    ) -> Self {
        Self {
            subscriptions,
            payment_provider,
        }
    }

    pub async fn handle(&self, cmd: CreateCheckoutSessionCommand) -> Result<CheckoutSession, DomainError> {
        if !cmd.plan.is_paid() {
            return Err(DomainError::validation(
                "plan",
                "Checkout is only available for paid plans",
            ));
        }

        let quantity = cmd.quantity.unwrap_or(1);
        if quantity == 0 || quantity > MAX_SEATS {
            return Err(ValidationError::out_of_range("quantity", 1, MAX_SEATS as i64, quantity as i64).into());
        }
        if quantity > 1 && cmd.plan != PlanId::Business {
            return Err(DomainError::validation(
                "quantity",
                "Only the business plan supports multiple seats",
            ));
        }

        let customer_id = self
            .subscriptions
            .find_by_user(&cmd.user_id)
            .await?
            .and_then(|s| s.stripe_customer_id);

        let session = self
            .payment_provider
            .create_checkout_session(CreateCheckoutRequest {
                user_id: cmd.user_id,
                plan: cmd.plan,
                quantity,
                email: if customer_id.is_some() { None } else { cmd.email },
                customer_id,
                success_url: cmd.success_url,
                cancel_url: cmd.cancel_url,
            })
            .await?;

        tracing::info!(
            user_id = %cmd.user_id,
            plan = %cmd.plan,
            session_id = %session.id,
            "checkout session created"
        );
        Ok(session)
    }
}

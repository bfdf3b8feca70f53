//! Subscription handlers.
//!
//! ## Commands
//! - Starting a hosted checkout for a paid plan
//! - Opening the billing portal
//! - Processing payment webhooks
//!
//! ## Queries
//! - Current subscription, effective limits and usage

mod create_checkout_session;
mod create_portal_session;
mod get_subscription;
mod handle_payment_webhook;

use crate::domain::foundation::{DomainError, UserId};
use crate::domain::subscription::Subscription;
use crate::ports::SubscriptionRepository;

// Commands
pub use create_checkout_session::{
    CreateCheckoutSessionCommand, CreateCheckoutSessionHandler, MAX_SEATS,
};
pub use create_portal_session::{CreatePortalSessionCommand, CreatePortalSessionHandler};
pub use handle_payment_webhook::{
    HandlePaymentWebhookCommand, HandlePaymentWebhookHandler, HandlePaymentWebhookResult,
};

// Queries
pub use get_subscription::{GetSubscriptionHandler, GetSubscriptionQuery, SubscriptionOverview};

/// The user's stored subscription, or the implicit free one.
pub(crate) async fn current_subscription(
    subscriptions: &dyn SubscriptionRepository,
    user_id: &UserId,
) -> Result<Subscription, DomainError> {
    Ok(subscriptions
        .find_by_user(user_id)
        .await?
        .unwrap_or_else(|| Subscription::free(*user_id)))
}

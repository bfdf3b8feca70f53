//! CreatePortalSessionHandler - Command handler for opening the billing portal.

use std::sync::Arc;

use crate::domain::foundation::{DomainError, ErrorCode, UserId};
use crate::ports::{PaymentProvider, PortalSession, SubscriptionRepository};

/// Command to open the billing portal.
#[derive(Debug, Clone)]
pub struct CreatePortalSessionCommand {
    pub user_id: UserId,
    pub return_url: String,
}

/// Handler for billing portal sessions. Requires a stored customer.
pub struct CreatePortalSessionHandler {
    subscriptions: Arc<dyn SubscriptionRepository>,
    payment_provider: Arc<dyn PaymentProvider>,
}

impl CreatePortalSessionHandler {
    pub fn new(
        subscriptions: Arc<dyn SubscriptionRepository>,
        payment_provider: Arc<dyn PaymentProvider>,
    ) -> Self {
        Self {
            subscriptions,
            payment_provider,
        }
    }

    pub async fn handle(&self, cmd: CreatePortalSessionCommand) -> Result<PortalSession, DomainError> {
        let customer_id = self
            .subscriptions
            .find_by_user(&cmd.user_id)
            .await?
            .and_then(|s| s.stripe_customer_id)
            .ok_or_else(|| {
                DomainError::new(ErrorCode::CustomerNotFound, "No billing account found for this user")
            })?;

        let session = self
            .payment_provider
            .create_portal_session(&customer_id, &cmd.return_url)
            .await?;

        tracing::info!(user_id = %cmd.user_id, "billing portal session created");
        Ok(session)
    }
}

//! Wallet pass handlers.
//!
//! Both pass types need a card the user owns and a plan that includes
//! wallet passes. Signing material is optional at runtime; a missing
//! signer is reported as a configuration error.

mod generate_apple_pass;
mod generate_google_pass;

use crate::domain::foundation::{DomainError, ErrorCode, UserId};
use crate::ports::SubscriptionRepository;

use super::subscription::current_subscription;

pub use generate_apple_pass::{ApplePassFile, GenerateApplePassCommand, GenerateApplePassHandler};
pub use generate_google_pass::{
    GenerateGooglePassCommand, GenerateGooglePassHandler, GooglePassLink,
};

/// Fails with `FeatureNotInPlan` unless the user's plan includes wallet passes.
pub(crate) async fn ensure_wallet_access(
    subscriptions: &dyn SubscriptionRepository,
    user_id: &UserId,
) -> Result<(), DomainError> {
    let limits = current_subscription(subscriptions, user_id).await?.limits();
    if limits.wallet_passes {
        Ok(())
    } else {
        Err(DomainError::new(
            ErrorCode::FeatureNotInPlan,
            format!("Wallet passes are not included in the {} plan", limits.plan.display_name()),
        )
        .with_detail("plan", limits.plan.as_str()))
    }
}

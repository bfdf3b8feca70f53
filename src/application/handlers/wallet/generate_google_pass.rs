//! GenerateGooglePassHandler - Command handler for Google Wallet save links.

use std::sync::Arc;

use crate::domain::foundation::{CardId, DomainError, UserId};
use crate::domain::wallet::{save_url, GoogleGenericObject, WalletError};
use crate::ports::{CardRepository, GoogleWalletSigner, SubscriptionRepository};

use super::super::cards::load_owned_card;
use super::ensure_wallet_access;

/// Command to generate a Google Wallet save link.
#[derive(Debug, Clone)]
pub struct GenerateGooglePassCommand {
    pub card_id: CardId,
    pub user_id: UserId,
    /// Base URL public card links are built from.
    pub public_base_url: String,
}

/// A save link and the object it carries.
#[derive(Debug, Clone, PartialEq)]
pub struct GooglePassLink {
    pub save_url: String,
    pub object: GoogleGenericObject,
}

/// Handler for Google Wallet passes.
pub struct GenerateGooglePassHandler {
    cards: Arc<dyn CardRepository>,
    subscriptions: Arc<dyn SubscriptionRepository>,
    signer: Option<Arc<dyn GoogleWalletSigner>>,
}

impl GenerateGooglePassHandler {
    pub fn new(
        cards: Arc<dyn CardRepository>,
        subscriptions: Arc<dyn SubscriptionRepository>,
        signer: Option<Arc<dyn GoogleWalletSigner>>,
    ) -> Self {
        Self {
            cards,
            subscriptions,
            signer,
        }
    }

    pub async fn handle(&self, cmd: GenerateGooglePassCommand) -> Result<GooglePassLink, DomainError> {
        let card = load_owned_card(self.cards.as_ref(), &cmd.card_id, &cmd.user_id).await?;
        ensure_wallet_access(self.subscriptions.as_ref(), &cmd.user_id).await?;

        let signer = self
            .signer
            .as_ref()
            .ok_or(WalletError::MissingConfiguration("Google Wallet service account"))?;

        let object = GoogleGenericObject::from_card(&card, signer.settings(), &card.public_url(&cmd.public_base_url))?;
        let token = signer.sign_save_token(&object).await?;

        tracing::info!(card_id = %card.id, "google wallet link generated");
        Ok(GooglePassLink {
            save_url: save_url(&token),
            object,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::test_support::{user, Stores};
    use crate::domain::foundation::ErrorCode;
    use crate::domain::subscription::PlanId;
    use crate::domain::wallet::{GoogleWalletSettings, SAVE_URL_BASE};
    use async_trait::async_trait;

    struct StubSigner(GoogleWalletSettings);

    #[async_trait]
    impl GoogleWalletSigner for StubSigner {
        fn settings(&self) -> &GoogleWalletSettings {
            &self.0
        }

        async fn sign_save_token(&self, object: &GoogleGenericObject) -> Result<String, WalletError> {
            Ok(format!("token-for-{}", object.id))
        }
    }

    fn signer() -> Option<Arc<dyn GoogleWalletSigner>> {
        Some(Arc::new(StubSigner(GoogleWalletSettings {
            issuer_id: "3388000000001".to_string(),
            class_suffix: "business_card".to_string(),
        })))
    }

    fn command(card_id: CardId, user_id: UserId) -> GenerateGooglePassCommand {
        GenerateGooglePassCommand {
            card_id,
            user_id,
            public_base_url: "https://cards.test".to_string(),
        }
    }

    #[tokio::test]
    async fn returns_signed_save_link() {
        let stores = Stores::new();
        let owner = user();
        stores.subscribe(owner, PlanId::Pro).await;
        let card = stores.add_card(owner, "Work").await;

        let link = GenerateGooglePassHandler::new(stores.cards(), stores.subscriptions(), signer())
            .handle(command(card.id, owner))
            .await
            .unwrap();

        assert_eq!(link.object.id, format!("3388000000001.{}", card.id));
        assert_eq!(link.save_url, format!("{}token-for-{}", SAVE_URL_BASE, link.object.id));
    }

    #[tokio::test]
    async fn unconfigured_signer_is_a_configuration_error() {
        let stores = Stores::new();
        let owner = user();
        stores.subscribe(owner, PlanId::Pro).await;
        let card = stores.add_card(owner, "Work").await;

        let err = GenerateGooglePassHandler::new(stores.cards(), stores.subscriptions(), None)
            .handle(command(card.id, owner))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::ConfigurationError);
    }

    #[tokio::test]
    async fn free_plan_is_rejected() {
        let stores = Stores::new();
        let owner = user();
        let card = stores.add_card(owner, "Work").await;

        let err = GenerateGooglePassHandler::new(stores.cards(), stores.subscriptions(), signer())
            .handle(command(card.id, owner))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::FeatureNotInPlan);
    }
}

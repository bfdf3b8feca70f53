//! GenerateApplePassHandler - Command handler for building a signed `.pkpass`.

use std::sync::Arc;

use crate::domain::card::download_file_name;
use crate::domain::foundation::{CardId, DomainError, UserId};
use crate::domain::wallet::{ApplePass, PassBundle, WalletError, PASS_FILE};
use crate::ports::{CardRepository, PassAssetStore, PassSigner, SubscriptionRepository};

use super::super::cards::load_owned_card;
use super::ensure_wallet_access;

const REQUIRED_ICON: &str = "icon.png";

/// Command to generate an Apple Wallet pass.
#[derive(Debug, Clone)]
pub struct GenerateApplePassCommand {
    pub card_id: CardId,
    pub user_id: UserId,
    /// Base URL public card links are built from.
    pub public_base_url: String,
}

/// A signed pass ready to download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApplePassFile {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

/// Handler for Apple Wallet passes.
pub struct GenerateApplePassHandler {
    cards: Arc<dyn CardRepository>,
    subscriptions: Arc<dyn SubscriptionRepository>,
    signer: Option<Arc<dyn PassSigner>>,
    assets: Option<Arc<dyn PassAssetStore>>,
}

impl GenerateApplePassHandler {
    pub fn new(
        cards: Arc<dyn CardRepository>,
        subscriptions: Arc<dyn SubscriptionRepository>,
        signer: Option<Arc<dyn PassSigner>>,
        assets: Option<Arc<dyn PassAssetStore>>,
    ) -> Self {
        Self {
            cards,
            subscriptions,
            signer,
            assets,
        }
    }

    pub async fn handle(&self, cmd: GenerateApplePassCommand) -> Result<ApplePassFile, DomainError> {
        let card = load_owned_card(self.cards.as_ref(), &cmd.card_id, &cmd.user_id).await?;
        ensure_wallet_access(self.subscriptions.as_ref(), &cmd.user_id).await?;

        let signer = self
            .signer
            .as_ref()
            .ok_or(WalletError::MissingConfiguration("Apple pass certificate"))?;
        let assets = self
            .assets
            .as_ref()
            .ok_or(WalletError::MissingConfiguration("Apple pass model directory"))?;

        let pass = ApplePass::from_card(&card, signer.settings(), &card.public_url(&cmd.public_base_url))?;

        let mut bundle = PassBundle::new();
        bundle.add_file(PASS_FILE, pass.to_json()?);
        for (name, contents) in assets.load_assets().await? {
            bundle.add_file(name, contents);
        }
        if !bundle.contains(REQUIRED_ICON) {
            return Err(WalletError::MissingAsset(REQUIRED_ICON.to_string()).into());
        }

        let manifest = bundle.manifest_json()?;
        let signature = signer.sign_manifest(&manifest).await?;
        let bytes = bundle.into_pkpass(&manifest, &signature)?;

        tracing::info!(card_id = %card.id, size = bytes.len(), "apple pass generated");
        Ok(ApplePassFile {
            file_name: download_file_name(&card, "pkpass"),
            bytes,
        })
    }
}

//! Google Wallet save-link signer.
//!
//! Save links carry an RS256 JWT signed with the issuer's service account
//! key. Google verifies it against the account's published certificates.

use async_trait::async_trait;
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};

use crate::config::GoogleWalletConfig;
use crate::domain::wallet::{GoogleGenericObject, GoogleWalletSettings, SaveClaims, WalletError};
use crate::ports::GoogleWalletSigner;

/// Signs save tokens with a service account key.
pub struct JwtGoogleWalletSigner {
    settings: GoogleWalletSettings,
    service_account_email: String,
    key: EncodingKey,
    /// Web origins allowed to show the save button.
    origins: Vec<String>,
}

impl JwtGoogleWalletSigner {
    pub fn from_pem(
        settings: GoogleWalletSettings,
        service_account_email: impl Into<String>,
        private_key_pem: &[u8],
        origins: Vec<String>,
    ) -> Result<Self, WalletError> {
        let key = EncodingKey::from_rsa_pem(private_key_pem)
            .map_err(|e| WalletError::load("Google service account key", e))?;
        Ok(Self {
            settings,
            service_account_email: service_account_email.into(),
            key,
            origins,
        })
    }

    /// Reads the service account key named in the config.
    pub fn from_config(config: &GoogleWalletConfig, origins: Vec<String>) -> Result<Self, WalletError> {
        let pem = std::fs::read(&config.private_key_path).map_err(|e| {
            WalletError::load(
                format!("Google service account key ({})", config.private_key_path.display()),
                e,
            )
        })?;
        let settings = GoogleWalletSettings {
            issuer_id: config.issuer_id.clone(),
            class_suffix: config.class_suffix.clone(),
        };

        let signer = Self::from_pem(settings, config.service_account_email.clone(), &pem, origins)?;
        tracing::info!(issuer_id = %config.issuer_id, "Google Wallet signer loaded");
        Ok(signer)
    }
}

#[async_trait]
impl GoogleWalletSigner for JwtGoogleWalletSigner {
    fn settings(&self) -> &GoogleWalletSettings {
        &self.settings
    }

    async fn sign_save_token(&self, object: &GoogleGenericObject) -> Result<String, WalletError> {
        let claims = SaveClaims::new(&self.service_account_email, object.clone(), self.origins.clone());
        encode(&Header::new(Algorithm::RS256), &claims, &self.key)
            .map_err(|e| WalletError::Signing(e.to_string()))
    }
}

impl std::fmt::Debug for JwtGoogleWalletSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtGoogleWalletSigner")
            .field("settings", &self.settings)
            .field("service_account_email", &self.service_account_email)
            .finish_non_exhaustive()
    }
}

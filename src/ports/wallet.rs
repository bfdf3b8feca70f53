//! Wallet pass signing ports.
//!
//! Signing material lives outside the domain: Apple passes need a detached
//! PKCS#7 signature from the pass certificate, Google save links need an
//! RS256 token from a service account. Both are optional at runtime; the
//! application reports a configuration error when one is absent.

use crate::domain::wallet::{ApplePassSettings, GoogleGenericObject, GoogleWalletSettings, WalletError};
use async_trait::async_trait;

/// Signs `.pkpass` manifests.
#[async_trait]
pub trait PassSigner: Send + Sync {
    /// Issuer identity written into every pass.
    fn settings(&self) -> &ApplePassSettings;

    /// Detached DER-encoded PKCS#7 signature over `manifest`.
    async fn sign_manifest(&self, manifest: &[u8]) -> Result<Vec<u8>, WalletError>;
}

/// Supplies the image files bundled into every pass.
#[async_trait]
pub trait PassAssetStore: Send + Sync {
    /// `(file name, bytes)` pairs. Must include `icon.png`.
    async fn load_assets(&self) -> Result<Vec<(String, Vec<u8>)>, WalletError>;
}

/// Signs Google Wallet save links.
#[async_trait]
pub trait GoogleWalletSigner: Send + Sync {
    /// Issuer identity used to build objects.
    fn settings(&self) -> &GoogleWalletSettings;

    /// Signed "save to wallet" JWT carrying `object`.
    async fn sign_save_token(&self, object: &GoogleGenericObject) -> Result<String, WalletError>;
}

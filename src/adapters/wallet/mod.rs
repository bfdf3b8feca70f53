//! Wallet pass adapters.
//!
//! - `OpenSslPassSigner` - Detached PKCS#7 manifest signatures for `.pkpass` bundles
//! - `FileSystemPassAssetStore` - Pass images read from the model directory
//! - `JwtGoogleWalletSigner` - RS256 "save to Google Wallet" tokens
//!
//! Each adapter is built once at startup from `WalletConfig`. A platform
//! without configuration simply has no adapter.

mod apple_signer;
mod asset_store;
mod google_signer;

pub use apple_signer::OpenSslPassSigner;
pub use asset_store::{FileSystemPassAssetStore, OPTIONAL_ASSETS, REQUIRED_ASSETS};
pub use google_signer::JwtGoogleWalletSigner;

//! Wallet pass domain module.
//!
//! Maps cards onto Apple PassKit and Google Wallet structures. Signing is
//! done by adapters behind the `PassSigner` and `GoogleWalletSigner` ports.
//!
//! # Module Structure
//!
//! - `apple` - `pass.json` model
//! - `bundle` - Manifest hashing and `.pkpass` archiving
//! - `google` - Generic object and save-link claims
//! - `errors` - WalletError

mod apple;
mod bundle;
mod errors;
mod google;

pub use apple::{ApplePass, ApplePassSettings, PassBarcode, PassField, PassStructure};
pub use bundle::{PassBundle, MANIFEST_FILE, PASS_FILE, PKPASS_CONTENT_TYPE, SIGNATURE_FILE};
pub use errors::WalletError;
pub use google::{
    save_url, GoogleGenericObject, GoogleWalletSettings, SaveClaims, SavePayload, SAVE_URL_BASE,
};

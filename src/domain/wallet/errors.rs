//! Wallet pass errors.

use thiserror::Error;

use crate::domain::foundation::{DomainError, ErrorCode};

/// Errors raised while building or signing a wallet pass.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WalletError {
    /// The card has neither a profile name nor a card name.
    #[error("Card has no name to put on the pass")]
    MissingName,

    /// A required wallet setting is absent.
    #[error("Wallet pass setting missing: {0}")]
    MissingConfiguration(&'static str),

    /// A required image asset is absent from the pass model directory.
    #[error("Pass asset missing: {0}")]
    MissingAsset(String),

    /// Reading signing material or assets failed.
    #[error("Failed to load {what}: {reason}")]
    Load { what: String, reason: String },

    /// Producing a signature or token failed.
    #[error("Signing failed: {0}")]
    Signing(String),

    /// Writing the pass archive failed.
    #[error("Failed to build pass archive: {0}")]
    Archive(String),
}

impl WalletError {
    pub fn load(what: impl Into<String>, reason: impl ToString) -> Self {
        Self::Load {
            what: what.into(),
            reason: reason.to_string(),
        }
    }
}

impl From<WalletError> for DomainError {
    fn from(err: WalletError) -> Self {
        let code = match &err {
            WalletError::MissingName => ErrorCode::ValidationFailed,
            WalletError::MissingConfiguration(_) | WalletError::MissingAsset(_) | WalletError::Load { .. } => {
                ErrorCode::ConfigurationError
            }
            WalletError::Signing(_) | WalletError::Archive(_) => ErrorCode::InternalError,
        };
        let domain = DomainError::new(code, err.to_string());
        if matches!(err, WalletError::MissingName) {
            domain.with_detail("field", "name")
        } else {
            domain
        }
    }
}

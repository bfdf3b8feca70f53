//! Wallet pass configuration

use serde::Deserialize;
use std::path::PathBuf;

use super::error::ValidationError;

/// Wallet pass configuration.
///
/// Both platforms are optional; a platform without configuration answers
/// pass requests with a configuration error.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WalletConfig {
    #[serde(default)]
    pub apple: Option<AppleWalletConfig>,

    #[serde(default)]
    pub google: Option<GoogleWalletConfig>,
}

/// Apple PassKit signing material and identifiers
#[derive(Debug, Clone, Deserialize)]
pub struct AppleWalletConfig {
    /// Pass type identifier (pass.com.example.card)
    pub pass_type_identifier: String,

    /// Apple developer team identifier
    pub team_identifier: String,

    /// Organisation name shown on the lock screen
    pub organization_name: String,

    /// Pass signing certificate (PEM)
    pub certificate_path: PathBuf,

    /// Private key for the signing certificate (PEM)
    pub private_key_path: PathBuf,

    /// Passphrase for the private key, if encrypted
    #[serde(default)]
    pub private_key_passphrase: Option<String>,

    /// Apple WWDR intermediate certificate (PEM)
    pub wwdr_certificate_path: PathBuf,

    /// Directory holding icon.png, logo.png and their @2x variants
    pub model_dir: PathBuf,
}

/// Google Wallet issuer and service account
#[derive(Debug, Clone, Deserialize)]
pub struct GoogleWalletConfig {
    /// Issuer ID from the Google Pay & Wallet console
    pub issuer_id: String,

    /// Suffix of the generic class objects are issued under
    #[serde(default = "default_class_suffix")]
    pub class_suffix: String,

    /// Service account email (`iss` of the save JWT)
    pub service_account_email: String,

    /// Service account RSA private key (PEM)
    pub private_key_path: PathBuf,
}

impl WalletConfig {
    /// Validate wallet configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if let Some(apple) = &self.apple {
            apple.validate()?;
        }
        if let Some(google) = &self.google {
            google.validate()?;
        }
        Ok(())
    }
}

impl AppleWalletConfig {
    fn validate(&self) -> Result<(), ValidationError> {
        if !self.pass_type_identifier.starts_with("pass.") {
            return Err(ValidationError::IncompleteAppleWallet("pass_type_identifier"));
        }
        if self.team_identifier.is_empty() {
            return Err(ValidationError::IncompleteAppleWallet("team_identifier"));
        }
        if self.organization_name.is_empty() {
            return Err(ValidationError::IncompleteAppleWallet("organization_name"));
        }
        Ok(())
    }
}

impl GoogleWalletConfig {
    fn validate(&self) -> Result<(), ValidationError> {
        if self.issuer_id.is_empty() || !self.issuer_id.chars().all(|c| c.is_ascii_digit()) {
            return Err(ValidationError::IncompleteGoogleWallet("issuer_id"));
        }
        if !self.service_account_email.contains('@') {
            return Err(ValidationError::IncompleteGoogleWallet("service_account_email"));
        }
        Ok(())
    }
}

fn default_class_suffix() -> String {
    "business_card".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn apple() -> AppleWalletConfig {
        AppleWalletConfig {
            pass_type_identifier: "pass.com.example.card".to_string(),
            team_identifier: "ABCDE12345".to_string(),
            organization_name: "Cardwise".to_string(),
            certificate_path: PathBuf::from("certs/pass.pem"),
            private_key_path: PathBuf::from("certs/pass.key"),
            private_key_passphrase: None,
            wwdr_certificate_path: PathBuf::from("certs/wwdr.pem"),
            model_dir: PathBuf::from("passes/model"),
        }
    }

    fn google() -> GoogleWalletConfig {
        GoogleWalletConfig {
            issuer_id: "3388000000012345678".to_string(),
            class_suffix: default_class_suffix(),
            service_account_email: "wallet@project.iam.gserviceaccount.com".to_string(),
            private_key_path: PathBuf::from("certs/google.pem"),
        }
    }

    #[test]
    fn empty_wallet_config_is_valid() {
        assert!(WalletConfig::default().validate().is_ok());
    }

    #[test]
    fn complete_platforms_are_valid() {
        let config = WalletConfig {
            apple: Some(apple()),
            google: Some(google()),
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn apple_pass_type_needs_pass_prefix() {
        let config = WalletConfig {
            apple: Some(AppleWalletConfig {
                pass_type_identifier: "com.example.card".to_string(),
                ..apple()
            }),
            google: None,
        };
        assert_eq!(
            config.validate(),
            Err(ValidationError::IncompleteAppleWallet("pass_type_identifier"))
        );
    }

    #[test]
    fn google_issuer_must_be_numeric() {
        let config = WalletConfig {
            apple: None,
            google: Some(GoogleWalletConfig {
                issuer_id: "issuer-abc".to_string(),
                ..google()
            }),
        };
        assert_eq!(
            config.validate(),
            Err(ValidationError::IncompleteGoogleWallet("issuer_id"))
        );
    }
}

//! OpenSSL implementation of PassSigner.
//!
//! Apple requires `signature` to be a detached, DER-encoded PKCS#7
//! signature of `manifest.json`, made with the pass type certificate and
//! carrying the Apple WWDR intermediate certificate.

use async_trait::async_trait;
use openssl::pkcs7::{Pkcs7, Pkcs7Flags};
use openssl::pkey::{PKey, Private};
use openssl::stack::Stack;
use openssl::x509::X509;

use crate::config::AppleWalletConfig;
use crate::domain::wallet::{ApplePassSettings, WalletError};
use crate::ports::PassSigner;

/// Signs pass manifests with a pass type certificate.
pub struct OpenSslPassSigner {
    settings: ApplePassSettings,
    certificate: X509,
    private_key: PKey<Private>,
    wwdr_certificate: X509,
}

impl OpenSslPassSigner {
    /// Builds a signer from PEM-encoded material.
    pub fn from_pem(
        settings: ApplePassSettings,
        certificate_pem: &[u8],
        private_key_pem: &[u8],
        passphrase: Option<&str>,
        wwdr_pem: &[u8],
    ) -> Result<Self, WalletError> {
        let certificate =
            X509::from_pem(certificate_pem).map_err(|e| WalletError::load("pass certificate", e))?;
        let private_key = match passphrase {
            Some(passphrase) => PKey::private_key_from_pem_passphrase(private_key_pem, passphrase.as_bytes()),
            None => PKey::private_key_from_pem(private_key_pem),
        }
        .map_err(|e| WalletError::load("pass private key", e))?;
        let wwdr_certificate =
            X509::from_pem(wwdr_pem).map_err(|e| WalletError::load("WWDR certificate", e))?;

        Ok(Self {
            settings,
            certificate,
            private_key,
            wwdr_certificate,
        })
    }

    /// Reads the certificate, key and WWDR files named in the config.
    pub fn from_config(config: &AppleWalletConfig) -> Result<Self, WalletError> {
        let read = |what: &str, path: &std::path::Path| {
            std::fs::read(path).map_err(|e| WalletError::load(format!("{} ({})", what, path.display()), e))
        };
        let certificate = read("pass certificate", &config.certificate_path)?;
        let private_key = read("pass private key", &config.private_key_path)?;
        let wwdr = read("WWDR certificate", &config.wwdr_certificate_path)?;

        let settings = ApplePassSettings {
            pass_type_identifier: config.pass_type_identifier.clone(),
            team_identifier: config.team_identifier.clone(),
            organization_name: config.organization_name.clone(),
        };

        let signer = Self::from_pem(
            settings,
            &certificate,
            &private_key,
            config.private_key_passphrase.as_deref(),
            &wwdr,
        )?;
        tracing::info!(
            pass_type_identifier = %config.pass_type_identifier,
            "Apple pass signer loaded"
        );
        Ok(signer)
    }
}

#[async_trait]
impl PassSigner for OpenSslPassSigner {
    fn settings(&self) -> &ApplePassSettings {
        &self.settings
    }

    /// RSA signing runs on the blocking pool.
    async fn sign_manifest(&self, manifest: &[u8]) -> Result<Vec<u8>, WalletError> {
        let certificate = self.certificate.clone();
        let private_key = self.private_key.clone();
        let wwdr_certificate = self.wwdr_certificate.clone();
        let manifest = manifest.to_vec();

        tokio::task::spawn_blocking(move || {
            sign_detached(&certificate, &private_key, &wwdr_certificate, &manifest)
        })
        .await
        .map_err(|e| WalletError::Signing(format!("signing task failed: {}", e)))?
    }
}

fn sign_detached(
    certificate: &X509,
    private_key: &PKey<Private>,
    wwdr_certificate: &X509,
    manifest: &[u8],
) -> Result<Vec<u8>, WalletError> {
    let signing = |e: openssl::error::ErrorStack| WalletError::Signing(e.to_string());

    let mut chain = Stack::new().map_err(signing)?;
    chain.push(wwdr_certificate.clone()).map_err(signing)?;

    let flags = Pkcs7Flags::BINARY | Pkcs7Flags::DETACHED;
    let pkcs7 = Pkcs7::sign(certificate, private_key, &chain, manifest, flags).map_err(signing)?;
    pkcs7.to_der().map_err(signing)
}

impl std::fmt::Debug for OpenSslPassSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenSslPassSigner")
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use openssl::asn1::Asn1Time;
    use openssl::bn::BigNum;
    use openssl::hash::MessageDigest;
    use openssl::rsa::Rsa;
    use openssl::symm::Cipher;
    use openssl::x509::store::X509StoreBuilder;
    use openssl::x509::{X509Builder, X509NameBuilder};

    fn self_signed(common_name: &str) -> (X509, PKey<Private>) {
        let key = PKey::from_rsa(Rsa::generate(2048).unwrap()).unwrap();

        let mut name = X509NameBuilder::new().unwrap();
        name.append_entry_by_text("CN", common_name).unwrap();
        let name = name.build();

        let mut builder = X509Builder::new().unwrap();
        builder.set_version(2).unwrap();
        let serial = BigNum::from_u32(1).unwrap().to_asn1_integer().unwrap();
        builder.set_serial_number(&serial).unwrap();
        builder.set_subject_name(&name).unwrap();
        builder.set_issuer_name(&name).unwrap();
        builder.set_pubkey(&key).unwrap();
        builder.set_not_before(&Asn1Time::days_from_now(0).unwrap()).unwrap();
        builder.set_not_after(&Asn1Time::days_from_now(1).unwrap()).unwrap();
        builder.sign(&key, MessageDigest::sha256()).unwrap();

        (builder.build(), key)
    }

    fn settings() -> ApplePassSettings {
        ApplePassSettings {
            pass_type_identifier: "pass.com.example.card".to_string(),
            team_identifier: "ABCDE12345".to_string(),
            organization_name: "Cardwise".to_string(),
        }
    }

    fn signer() -> OpenSslPassSigner {
        let (cert, key) = self_signed("Pass Type ID: pass.com.example.card");
        let (wwdr, _) = self_signed("Apple WWDR Test");
        OpenSslPassSigner::from_pem(
            settings(),
            &cert.to_pem().unwrap(),
            &key.private_key_to_pem_pkcs8().unwrap(),
            None,
            &wwdr.to_pem().unwrap(),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn signature_is_detached_pkcs7_over_manifest() {
        let manifest = br#"{"pass.json":"abc"}"#;
        let der = signer().sign_manifest(manifest).await.unwrap();

        let pkcs7 = Pkcs7::from_der(&der).unwrap();
        let store = X509StoreBuilder::new().unwrap().build();
        let certs = Stack::new().unwrap();
        let mut out = Vec::new();
        pkcs7
            .verify(
                &certs,
                &store,
                Some(manifest),
                Some(&mut out),
                Pkcs7Flags::NOVERIFY | Pkcs7Flags::BINARY,
            )
            .unwrap();
        assert_eq!(out, manifest);
    }

    #[tokio::test]
    async fn signature_does_not_match_other_content() {
        let der = signer().sign_manifest(b"original").await.unwrap();

        let pkcs7 = Pkcs7::from_der(&der).unwrap();
        let store = X509StoreBuilder::new().unwrap().build();
        let certs = Stack::new().unwrap();
        let result = pkcs7.verify(
            &certs,
            &store,
            Some(b"tampered"),
            None,
            Pkcs7Flags::NOVERIFY | Pkcs7Flags::BINARY,
        );
        assert!(result.is_err());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn concurrent_signatures_run_off_the_runtime() {
        let signer = std::sync::Arc::new(signer());
        let tasks: Vec<_> = (0..4)
            .map(|i| {
                let signer = signer.clone();
                tokio::spawn(async move {
                    let manifest = format!("{{\"pass.json\":\"{}\"}}", i);
                    signer.sign_manifest(manifest.as_bytes()).await
                })
            })
            .collect();

        for task in tasks {
            let der = task.await.unwrap().unwrap();
            assert!(Pkcs7::from_der(&der).is_ok());
        }
    }

    #[test]
    fn encrypted_key_needs_passphrase() {
        let (cert, key) = self_signed("Pass Type ID: pass.com.example.card");
        let encrypted = key
            .private_key_to_pem_pkcs8_passphrase(Cipher::aes_256_cbc(), b"hunter2")
            .unwrap();
        let cert_pem = cert.to_pem().unwrap();

        let ok = OpenSslPassSigner::from_pem(settings(), &cert_pem, &encrypted, Some("hunter2"), &cert_pem);
        assert!(ok.is_ok());

        let wrong = OpenSslPassSigner::from_pem(settings(), &cert_pem, &encrypted, Some("nope"), &cert_pem);
        assert!(matches!(wrong, Err(WalletError::Load { .. })));
    }

    #[test]
    fn garbage_certificate_is_a_load_error() {
        let err = OpenSslPassSigner::from_pem(settings(), b"not pem", b"", None, b"").unwrap_err();
        assert!(matches!(err, WalletError::Load { ref what, .. } if what == "pass certificate"));
    }

    #[test]
    fn missing_files_are_load_errors() {
        let config = AppleWalletConfig {
            pass_type_identifier: "pass.com.example.card".to_string(),
            team_identifier: "ABCDE12345".to_string(),
            organization_name: "Cardwise".to_string(),
            certificate_path: "/nonexistent/pass.pem".into(),
            private_key_path: "/nonexistent/key.pem".into(),
            private_key_passphrase: None,
            wwdr_certificate_path: "/nonexistent/wwdr.pem".into(),
            model_dir: "/nonexistent".into(),
        };
        assert!(matches!(
            OpenSslPassSigner::from_config(&config),
            Err(WalletError::Load { .. })
        ));
    }
}

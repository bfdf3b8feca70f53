//! `.pkpass` bundle assembly.
//!
//! A bundle is `pass.json`, its images, a `manifest.json` mapping every file
//! to its SHA-1 hex digest, and a detached `signature` over the manifest.
//! Signing happens outside the domain; this module hashes and zips.

use sha1::{Digest, Sha1};
use std::collections::BTreeMap;
use std::io::{Cursor, Write};
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipWriter};

use super::WalletError;

pub const MANIFEST_FILE: &str = "manifest.json";
pub const SIGNATURE_FILE: &str = "signature";
pub const PASS_FILE: &str = "pass.json";

/// MIME type of a signed pass archive.
pub const PKPASS_CONTENT_TYPE: &str = "application/vnd.apple.pkpass";

/// Unsigned pass contents keyed by file name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PassBundle {
    files: BTreeMap<String, Vec<u8>>,
}

impl PassBundle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces a file.
    pub fn add_file(&mut self, name: impl Into<String>, contents: Vec<u8>) {
        self.files.insert(name.into(), contents);
    }

    pub fn contains(&self, name: &str) -> bool {
        self.files.contains_key(name)
    }

    pub fn file_names(&self) -> impl Iterator<Item = &str> {
        self.files.keys().map(String::as_str)
    }

    /// SHA-1 hex digest of every file.
    pub fn manifest(&self) -> BTreeMap<String, String> {
        self.files
            .iter()
            .map(|(name, contents)| (name.clone(), hex::encode(Sha1::digest(contents))))
            .collect()
    }

    /// Serialized `manifest.json`, the bytes the signature covers.
    pub fn manifest_json(&self) -> Result<Vec<u8>, WalletError> {
        serde_json::to_vec(&self.manifest()).map_err(|e| WalletError::Archive(e.to_string()))
    }

    /// Zips the files, manifest and detached signature into a `.pkpass`.
    pub fn into_pkpass(self, manifest: &[u8], signature: &[u8]) -> Result<Vec<u8>, WalletError> {
        let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
        let options = FileOptions::default().compression_method(CompressionMethod::Deflated);

        let entries = self
            .files
            .iter()
            .map(|(name, contents)| (name.as_str(), contents.as_slice()))
            .chain([(MANIFEST_FILE, manifest), (SIGNATURE_FILE, signature)]);

        for (name, contents) in entries {
            zip.start_file(name, options)
                .map_err(|e| WalletError::Archive(e.to_string()))?;
            zip.write_all(contents)
                .map_err(|e| WalletError::Archive(e.to_string()))?;
        }

        let cursor = zip.finish().map_err(|e| WalletError::Archive(e.to_string()))?;
        Ok(cursor.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;
    use zip::ZipArchive;

    fn bundle() -> PassBundle {
        let mut bundle = PassBundle::new();
        bundle.add_file(PASS_FILE, br#"{"formatVersion":1}"#.to_vec());
        bundle.add_file("icon.png", vec![0x89, b'P', b'N', b'G']);
        bundle
    }

    #[test]
    fn manifest_hashes_every_file() {
        let manifest = bundle().manifest();
        assert_eq!(manifest.len(), 2);
        let mut empty = PassBundle::new();
        empty.add_file("empty", Vec::new());
        assert_eq!(
            empty.manifest()["empty"],
            "da39a3ee5e6b4b0d3255bfef95601890afd80709"
        );
        assert!(manifest.values().all(|digest| digest.len() == 40));
    }

    #[test]
    fn manifest_json_is_sorted_object() {
        let json = bundle().manifest_json().unwrap();
        let value: serde_json::Value = serde_json::from_slice(&json).unwrap();
        let keys: Vec<&String> = value.as_object().unwrap().keys().collect();
        assert_eq!(keys, vec!["icon.png", "pass.json"]);
    }

    #[test]
    fn pkpass_contains_files_manifest_and_signature() {
        let bundle = bundle();
        let manifest = bundle.manifest_json().unwrap();
        let bytes = bundle.into_pkpass(&manifest, b"sig").unwrap();

        let mut archive = ZipArchive::new(Cursor::new(bytes)).unwrap();
        let mut names: Vec<String> = archive.file_names().map(String::from).collect();
        names.sort();
        assert_eq!(names, vec!["icon.png", "manifest.json", "pass.json", "signature"]);

        let mut signature = Vec::new();
        archive
            .by_name(SIGNATURE_FILE)
            .unwrap()
            .read_to_end(&mut signature)
            .unwrap();
        assert_eq!(signature, b"sig");
    }

    #[test]
    fn add_file_replaces_existing() {
        let mut bundle = bundle();
        bundle.add_file("icon.png", vec![1]);
        assert!(bundle.contains("icon.png"));
        assert_eq!(bundle.file_names().count(), 2);
    }
}

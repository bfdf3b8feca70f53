//! Filesystem implementation of PassAssetStore.
//!
//! Reads pass images from the configured model directory on every request,
//! so replacing an image does not need a restart.

use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::PathBuf;
use tokio::fs;

use crate::domain::wallet::WalletError;
use crate::ports::PassAssetStore;

/// Images every pass must carry.
pub const REQUIRED_ASSETS: &[&str] = &["icon.png"];

/// Images bundled when present.
pub const OPTIONAL_ASSETS: &[&str] = &["icon@2x.png", "icon@3x.png", "logo.png", "logo@2x.png"];

/// Pass images stored in a directory.
#[derive(Debug, Clone)]
pub struct FileSystemPassAssetStore {
    model_dir: PathBuf,
}

impl FileSystemPassAssetStore {
    pub fn new(model_dir: impl Into<PathBuf>) -> Self {
        Self {
            model_dir: model_dir.into(),
        }
    }

    async fn read(&self, name: &str) -> Result<Option<Vec<u8>>, WalletError> {
        let path = self.model_dir.join(name);
        match fs::read(&path).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(WalletError::load(format!("pass asset {}", path.display()), e)),
        }
    }
}

#[async_trait]
impl PassAssetStore for FileSystemPassAssetStore {
    async fn load_assets(&self) -> Result<Vec<(String, Vec<u8>)>, WalletError> {
        let mut assets = Vec::new();

        for name in REQUIRED_ASSETS {
            let bytes = self.read(name).await?.ok_or_else(|| {
                tracing::error!(model_dir = %self.model_dir.display(), asset = name, "Required pass asset missing");
                WalletError::MissingAsset(name.to_string())
            })?;
            assets.push((name.to_string(), bytes));
        }

        for name in OPTIONAL_ASSETS {
            if let Some(bytes) = self.read(name).await? {
                assets.push((name.to_string(), bytes));
            }
        }

        Ok(assets)
    }
}

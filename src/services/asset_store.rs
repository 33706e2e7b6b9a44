//! AssetStore — writes thumbnail images into the public assets directory
//! under random, URL-safe names.

use base64::{Engine as _, engine::general_purpose};
use rand::TryRngCore;
use rand::rngs::OsRng;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::fs;

#[derive(Debug, Error)]
pub enum AssetError {
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error("system random source failed: {0}")]
    Rng(String),
}

/// Map a validated image MIME essence to the on-disk extension.
/// Anything outside the allowed set is rejected upstream with a 400.
pub fn extension_for(mime_essence: &str) -> Option<&'static str> {
    match mime_essence {
        "image/jpeg" => Some(".jpg"),
        "image/png" => Some(".png"),
        _ => None,
    }
}

#[derive(Clone)]
pub struct AssetStore {
    root: PathBuf,
    public_port: u16,
}

impl AssetStore {
    pub fn new(root: impl Into<PathBuf>, public_port: u16) -> Self {
        Self {
            root: root.into(),
            public_port,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Write `data` verbatim under a freshly generated random name and return
    /// that file name (with extension).
    pub async fn save(&self, data: &[u8], extension: &str) -> Result<String, AssetError> {
        let file_name = format!("{}{}", random_name()?, extension);
        fs::write(self.root.join(&file_name), data).await?;
        Ok(file_name)
    }

    /// Locally served URL for a stored asset.
    pub fn url_for(&self, file_name: &str) -> String {
        format!("http://localhost:{}/assets/{}", self.public_port, file_name)
    }
}

/// 32 CSPRNG bytes as unpadded URL-safe base64.
fn random_name() -> Result<String, AssetError> {
    let mut raw = [0u8; 32];
    OsRng
        .try_fill_bytes(&mut raw)
        .map_err(|err| AssetError::Rng(err.to_string()))?;
    Ok(general_purpose::URL_SAFE_NO_PAD.encode(raw))
}

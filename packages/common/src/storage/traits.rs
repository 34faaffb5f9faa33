use async_trait::async_trait;
use bytes::Bytes;

use super::error::StorageError;

/// Raw image bytes received from a client, with whatever naming hints came along.
#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub bytes: Bytes,
    pub file_name: Option<String>,
    pub content_type: Option<String>,
}

impl ImageUpload {
    pub fn new(bytes: impl Into<Bytes>) -> Self {
        Self {
            bytes: bytes.into(),
            file_name: None,
            content_type: None,
        }
    }

    pub fn with_file_name(mut self, name: impl Into<String>) -> Self {
        self.file_name = Some(name.into());
        self
    }

    /// Best guess at a file extension, from the file name first and the MIME type second.
    pub fn extension(&self) -> Option<String> {
        let from_name = self
            .file_name
            .as_deref()
            .and_then(|name| std::path::Path::new(name).extension())
            .and_then(|ext| ext.to_str())
            .filter(|ext| !ext.is_empty() && ext.chars().all(|c| c.is_ascii_alphanumeric()));
        if let Some(ext) = from_name {
            return Some(ext.to_ascii_lowercase());
        }

        self.content_type
            .as_deref()
            .and_then(mime_guess::get_mime_extensions_str)
            .and_then(|exts| exts.first())
            .map(|ext| ext.to_string())
    }
}

/// What the asset store hands back after a successful upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredAsset {
    /// Opaque identifier used to delete the asset later.
    pub public_id: String,
    /// Publicly reachable URL of the asset.
    pub url: String,
}

/// External image storage addressed by opaque public ids.
#[async_trait]
pub trait AssetStore: Send + Sync {
    /// Upload bytes into `folder` and return the new asset's id and URL.
    async fn upload(&self, folder: &str, upload: ImageUpload)
    -> Result<StoredAsset, StorageError>;

    /// Delete an asset by public id.
    ///
    /// Returns `true` if the asset was deleted, `false` if it did not exist.
    async fn delete(&self, public_id: &str) -> Result<bool, StorageError>;

    /// Check whether an asset exists.
    async fn exists(&self, public_id: &str) -> Result<bool, StorageError>;
}

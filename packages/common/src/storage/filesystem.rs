use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;

use super::error::StorageError;
use super::traits::{AssetStore, ImageUpload, StoredAsset};

/// Local-directory asset store for running without an image host.
///
/// Assets are stored as `{root}/{folder}/{uuid}.{ext}`; the public id is the
/// path relative to `root` and the URL is that path under `public_base_url`.
pub struct FilesystemAssetStore {
    root: PathBuf,
    public_base_url: String,
    max_size: u64,
}

impl FilesystemAssetStore {
    /// Create a new filesystem asset store.
    pub async fn new(
        root: PathBuf,
        public_base_url: impl Into<String>,
        max_size: u64,
    ) -> Result<Self, StorageError> {
        fs::create_dir_all(&root).await?;
        fs::create_dir_all(root.join(".tmp")).await?;
        Ok(Self {
            root,
            public_base_url: public_base_url.into(),
            max_size,
        })
    }

    /// Map a public id to its file, rejecting anything that escapes the root.
    pub fn resolve(&self, public_id: &str) -> Result<PathBuf, StorageError> {
        let relative = Path::new(public_id);
        let confined = !public_id.is_empty()
            && relative
                .components()
                .all(|c| matches!(c, Component::Normal(part) if part != ".tmp"));
        if !confined {
            return Err(StorageError::InvalidPublicId(public_id.to_string()));
        }
        Ok(self.root.join(relative))
    }

    fn url_for(&self, public_id: &str) -> String {
        format!("{}/{}", self.public_base_url.trim_end_matches('/'), public_id)
    }

    /// Path for a temporary file during writes.
    fn temp_path(&self) -> PathBuf {
        self.root
            .join(".tmp")
            .join(uuid::Uuid::new_v4().to_string())
    }
}

#[async_trait]
impl AssetStore for FilesystemAssetStore {
    async fn upload(
        &self,
        folder: &str,
        upload: ImageUpload,
    ) -> Result<StoredAsset, StorageError> {
        let size = upload.bytes.len() as u64;
        if size > self.max_size {
            return Err(StorageError::SizeLimitExceeded {
                actual: size,
                limit: self.max_size,
            });
        }

        let name = match upload.extension() {
            Some(ext) => format!("{}.{ext}", uuid::Uuid::new_v4().simple()),
            None => uuid::Uuid::new_v4().simple().to_string(),
        };
        let public_id = format!("{}/{name}", folder.trim_matches('/'));
        let target = self.resolve(&public_id)?;

        let temp_path = self.temp_path();
        if let Err(e) = fs::write(&temp_path, &upload.bytes).await {
            let _ = fs::remove_file(&temp_path).await;
            return Err(e.into());
        }

        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent).await?;
        }

        if let Err(e) = fs::rename(&temp_path, &target).await {
            let _ = fs::remove_file(&temp_path).await;
            return Err(e.into());
        }

        Ok(StoredAsset {
            url: self.url_for(&public_id),
            public_id,
        })
    }

    async fn delete(&self, public_id: &str) -> Result<bool, StorageError> {
        let path = self.resolve(public_id)?;
        match fs::remove_file(&path).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    async fn exists(&self, public_id: &str) -> Result<bool, StorageError> {
        let path = self.resolve(public_id)?;
        Ok(fs::try_exists(&path).await?)
    }
}

use std::sync::Arc;

use common::config::{StorageBackend, StorageConfig};
use common::storage::cloudinary::CloudinaryAssetStore;
use common::storage::filesystem::FilesystemAssetStore;
use common::storage::{AssetFolder, AssetStore, StorageError};

use crate::config::AppConfig;
use crate::images::{ImageSync, OrphanReporter};
use crate::store::{CollectionModel, DocumentStore, Repository};

#[derive(Clone)]
pub struct AppState {
    pub db: Arc<dyn DocumentStore>,
    pub assets: Arc<dyn AssetStore>,
    /// Set only with the filesystem backend, whose files this server serves itself.
    pub local_assets: Option<Arc<FilesystemAssetStore>>,
    pub orphans: Arc<dyn OrphanReporter>,
    pub config: AppConfig,
}

impl AppState {
    pub fn repo<M: CollectionModel>(&self) -> Repository<'_, M> {
        Repository::new(self.db.as_ref())
    }

    pub fn images(&self, folder: AssetFolder) -> ImageSync<'_> {
        ImageSync::new(
            self.assets.as_ref(),
            self.orphans.as_ref(),
            folder.path(&self.config.storage.folder_prefix),
        )
    }
}

/// The configured asset backend, plus the filesystem handle when that backend is local.
pub struct AssetBackend {
    pub store: Arc<dyn AssetStore>,
    pub local: Option<Arc<FilesystemAssetStore>>,
}

pub async fn init_assets(config: &StorageConfig) -> Result<AssetBackend, StorageError> {
    match config.backend {
        StorageBackend::Cloudinary => Ok(AssetBackend {
            store: Arc::new(CloudinaryAssetStore::new(config.cloudinary.clone())?),
            local: None,
        }),
        StorageBackend::Filesystem => {
            let fs = Arc::new(
                FilesystemAssetStore::new(
                    config.filesystem.root.clone(),
                    config.filesystem.public_base_url.clone(),
                    config.max_upload_size,
                )
                .await?,
            );
            Ok(AssetBackend {
                store: fs.clone(),
                local: Some(fs),
            })
        }
    }
}

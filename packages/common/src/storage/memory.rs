use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use bytes::Bytes;

use super::error::StorageError;
use super::traits::{AssetStore, ImageUpload, StoredAsset};

/// A call the store received, in arrival order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssetOp {
    Upload { folder: String },
    Delete { public_id: String },
}

#[derive(Default)]
struct Inner {
    assets: HashMap<String, Bytes>,
    ops: Vec<AssetOp>,
    next_id: u64,
    fail_uploads: bool,
    fail_deletes: bool,
}

/// In-process asset store that keeps bytes in memory and logs every upload
/// and delete, including ones made to fail on purpose.
#[derive(Default)]
pub struct MemoryAssetStore {
    inner: Mutex<Inner>,
}

impl MemoryAssetStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Place an asset under a caller-chosen public id without logging an upload.
    pub fn seed(&self, public_id: impl Into<String>, bytes: impl Into<Bytes>) {
        self.lock().assets.insert(public_id.into(), bytes.into());
    }

    /// Bytes stored under `public_id`, if any.
    pub fn get(&self, public_id: &str) -> Option<Bytes> {
        self.lock().assets.get(public_id).cloned()
    }

    pub fn operations(&self) -> Vec<AssetOp> {
        self.lock().ops.clone()
    }

    pub fn len(&self) -> usize {
        self.lock().assets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Make subsequent uploads fail with a rejected-request error.
    pub fn fail_uploads(&self, fail: bool) {
        self.lock().fail_uploads = fail;
    }

    /// Make subsequent deletes fail with a transport error.
    pub fn fail_deletes(&self, fail: bool) {
        self.lock().fail_deletes = fail;
    }
}

#[async_trait]
impl AssetStore for MemoryAssetStore {
    async fn upload(
        &self,
        folder: &str,
        upload: ImageUpload,
    ) -> Result<StoredAsset, StorageError> {
        let mut inner = self.lock();
        inner.ops.push(AssetOp::Upload {
            folder: folder.to_string(),
        });
        if inner.fail_uploads {
            return Err(StorageError::Rejected {
                status: 400,
                message: "upload refused".into(),
            });
        }

        inner.next_id += 1;
        let public_id = format!("{}/asset-{}", folder.trim_matches('/'), inner.next_id);
        inner.assets.insert(public_id.clone(), upload.bytes);

        Ok(StoredAsset {
            url: format!("memory://{public_id}"),
            public_id,
        })
    }

    async fn delete(&self, public_id: &str) -> Result<bool, StorageError> {
        let mut inner = self.lock();
        inner.ops.push(AssetOp::Delete {
            public_id: public_id.to_string(),
        });
        if inner.fail_deletes {
            return Err(StorageError::Transport("connection reset".into()));
        }
        Ok(inner.assets.remove(public_id).is_some())
    }

    async fn exists(&self, public_id: &str) -> Result<bool, StorageError> {
        Ok(self.lock().assets.contains_key(public_id))
    }
}

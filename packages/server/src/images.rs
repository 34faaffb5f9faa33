//! Keeps a document's image reference in step with the asset store.
//!
//! The two stores share no transaction. Ordering is fixed: on replace the old
//! asset is deleted before the new one is uploaded, and on release the asset is
//! deleted before the document. Deletes are best effort: a failure never blocks
//! the document mutation and is handed to an [`OrphanReporter`] instead.
//! An upload whose document write then fails is not compensated; it is
//! reported as orphaned and left in place.

use std::fmt::{self, Display};
use std::future::Future;
use std::sync::{Mutex, PoisonError};

use common::storage::{AssetStore, ImageUpload, StorageError, StoredAsset};
use tracing::{debug, warn};

/// An image URL and its asset public id, persisted together on a document.
///
/// Both are empty when the document has no image.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImageRef {
    pub url: String,
    pub public_id: String,
}

impl ImageRef {
    pub fn is_empty(&self) -> bool {
        self.public_id.is_empty()
    }
}

impl From<StoredAsset> for ImageRef {
    fn from(asset: StoredAsset) -> Self {
        Self {
            url: asset.url,
            public_id: asset.public_id,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrphanCause {
    /// Deleting a replaced or released asset failed.
    DeleteFailed,
    /// The asset was uploaded but the document referencing it was never written.
    DocumentWriteFailed,
}

impl Display for OrphanCause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::DeleteFailed => "delete_failed",
            Self::DocumentWriteFailed => "document_write_failed",
        })
    }
}

/// An asset that may still exist in the asset store with nothing pointing at it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrphanedAsset {
    pub public_id: String,
    pub folder: String,
    pub cause: OrphanCause,
    pub error: String,
}

/// Receives assets the synchronizer could not keep consistent.
pub trait OrphanReporter: Send + Sync {
    fn report(&self, orphan: OrphanedAsset);
}

/// Emits each orphan as a structured `warn` event.
pub struct TracingOrphanReporter;

impl OrphanReporter for TracingOrphanReporter {
    fn report(&self, orphan: OrphanedAsset) {
        warn!(
            public_id = %orphan.public_id,
            folder = %orphan.folder,
            cause = %orphan.cause,
            error = %orphan.error,
            "asset left orphaned"
        );
    }
}

/// Keeps every report in memory.
#[derive(Default)]
pub struct RecordingOrphanReporter {
    reports: Mutex<Vec<OrphanedAsset>>,
}

impl RecordingOrphanReporter {
    pub fn reports(&self) -> Vec<OrphanedAsset> {
        self.reports
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl OrphanReporter for RecordingOrphanReporter {
    fn report(&self, orphan: OrphanedAsset) {
        self.reports
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(orphan);
    }
}

/// Attach, replace, and release the image of one entity kind.
pub struct ImageSync<'a> {
    store: &'a dyn AssetStore,
    reporter: &'a dyn OrphanReporter,
    folder: String,
}

impl<'a> ImageSync<'a> {
    pub fn new(
        store: &'a dyn AssetStore,
        reporter: &'a dyn OrphanReporter,
        folder: impl Into<String>,
    ) -> Self {
        Self {
            store,
            reporter,
            folder: folder.into(),
        }
    }

    /// Image for a new document: empty without an upload, otherwise the
    /// uploaded asset. An upload failure aborts the create.
    pub async fn attach(&self, upload: Option<ImageUpload>) -> Result<ImageRef, StorageError> {
        match upload {
            None => Ok(ImageRef::default()),
            Some(upload) => self.upload(upload).await,
        }
    }

    /// Image for an updated document. Without an upload the existing pair is
    /// carried forward untouched.
    pub async fn replace(
        &self,
        existing: &ImageRef,
        upload: Option<ImageUpload>,
    ) -> Result<ImageRef, StorageError> {
        let Some(upload) = upload else {
            return Ok(existing.clone());
        };
        self.discard(&existing.public_id).await;
        self.upload(upload).await
    }

    /// Drop the image of a document that is about to be deleted.
    pub async fn release(&self, existing: &ImageRef) {
        self.discard(&existing.public_id).await;
    }

    /// Run the document write that follows an upload.
    ///
    /// `fresh` is the image uploaded for this write, if any. When the write
    /// fails it is reported as orphaned; the write's error is returned as is.
    pub async fn commit<T, E, F>(&self, fresh: Option<&ImageRef>, write: F) -> Result<T, E>
    where
        F: Future<Output = Result<T, E>>,
        E: Display,
    {
        let result = write.await;
        if let (Err(e), Some(image)) = (&result, fresh) {
            self.abandon(image, e);
        }
        result
    }

    /// Report a freshly uploaded image whose document will not reference it.
    pub fn abandon(&self, fresh: &ImageRef, error: &dyn Display) {
        if fresh.is_empty() {
            return;
        }
        self.reporter.report(OrphanedAsset {
            public_id: fresh.public_id.clone(),
            folder: self.folder.clone(),
            cause: OrphanCause::DocumentWriteFailed,
            error: error.to_string(),
        });
    }

    async fn upload(&self, upload: ImageUpload) -> Result<ImageRef, StorageError> {
        let size = upload.bytes.len();
        let asset = self.store.upload(&self.folder, upload).await?;
        debug!(folder = %self.folder, public_id = %asset.public_id, size, "image uploaded");
        Ok(asset.into())
    }

    async fn discard(&self, public_id: &str) {
        if public_id.is_empty() {
            return;
        }
        match self.store.delete(public_id).await {
            Ok(true) => debug!(folder = %self.folder, public_id, "image deleted"),
            Ok(false) => debug!(folder = %self.folder, public_id, "image already gone"),
            Err(e) => self.reporter.report(OrphanedAsset {
                public_id: public_id.to_string(),
                folder: self.folder.clone(),
                cause: OrphanCause::DeleteFailed,
                error: e.to_string(),
            }),
        }
    }
}

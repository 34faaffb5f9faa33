mod error;
mod folder;
mod traits;

pub mod cloudinary;
pub mod filesystem;
pub mod memory;

pub use error::StorageError;
pub use folder::AssetFolder;
pub use traits::{AssetStore, ImageUpload, StoredAsset};

use std::path::PathBuf;

use serde::Deserialize;

/// Which asset backend the server uploads images to.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    #[default]
    Cloudinary,
    Filesystem,
}

/// Digest used to sign Cloudinary API calls. Must match the account setting.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum SignatureAlgorithm {
    #[default]
    Sha1,
    Sha256,
}

/// App-level asset storage configuration.
#[derive(Debug, Deserialize, Clone)]
pub struct StorageConfig {
    /// Default: cloudinary.
    #[serde(default)]
    pub backend: StorageBackend,
    /// Prepended to every entity folder, e.g. "menu" gives "menu/products". Default: "menu".
    #[serde(default = "default_folder_prefix")]
    pub folder_prefix: String,
    /// Maximum accepted request body for image uploads, in bytes. Default: 10 MiB.
    #[serde(default = "default_max_upload_size")]
    pub max_upload_size: u64,
    #[serde(default)]
    pub cloudinary: CloudinaryConfig,
    #[serde(default)]
    pub filesystem: FilesystemConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct CloudinaryConfig {
    #[serde(default)]
    pub cloud_name: String,
    #[serde(default)]
    pub api_key: String,
    #[serde(default)]
    pub api_secret: String,
    #[serde(default)]
    pub signature_algorithm: SignatureAlgorithm,
    /// Default: "https://api.cloudinary.com".
    #[serde(default = "default_cloudinary_api_base")]
    pub api_base: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct FilesystemConfig {
    /// Directory holding uploaded files. Default: "./uploads".
    #[serde(default = "default_filesystem_root")]
    pub root: PathBuf,
    /// URL prefix the server serves uploaded files under. Default: "/assets".
    #[serde(default = "default_public_base_url")]
    pub public_base_url: String,
}

fn default_folder_prefix() -> String {
    "menu".into()
}
fn default_max_upload_size() -> u64 {
    10 * 1024 * 1024
}
fn default_cloudinary_api_base() -> String {
    "https://api.cloudinary.com".into()
}
fn default_filesystem_root() -> PathBuf {
    PathBuf::from("./uploads")
}
fn default_public_base_url() -> String {
    "/assets".into()
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::default(),
            folder_prefix: default_folder_prefix(),
            max_upload_size: default_max_upload_size(),
            cloudinary: CloudinaryConfig::default(),
            filesystem: FilesystemConfig::default(),
        }
    }
}

impl Default for CloudinaryConfig {
    fn default() -> Self {
        Self {
            cloud_name: String::new(),
            api_key: String::new(),
            api_secret: String::new(),
            signature_algorithm: SignatureAlgorithm::default(),
            api_base: default_cloudinary_api_base(),
        }
    }
}

impl Default for FilesystemConfig {
    fn default() -> Self {
        Self {
            root: default_filesystem_root(),
            public_base_url: default_public_base_url(),
        }
    }
}

//! Cloudinary image host via its REST API (no SDK dependency).

use std::time::{SystemTime, UNIX_EPOCH};

use async_trait::async_trait;
use reqwest::StatusCode;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use sha1::Sha1;
use sha2::{Digest, Sha256};
use tracing::debug;

use super::error::StorageError;
use super::traits::{AssetStore, ImageUpload, StoredAsset};
use crate::config::{CloudinaryConfig, SignatureAlgorithm};

pub struct CloudinaryAssetStore {
    client: reqwest::Client,
    config: CloudinaryConfig,
}

#[derive(Deserialize)]
struct UploadResponse {
    public_id: String,
    secure_url: String,
}

#[derive(Deserialize)]
struct DestroyResponse {
    result: String,
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ErrorDetail,
}

#[derive(Deserialize)]
struct ErrorDetail {
    message: String,
}

impl CloudinaryAssetStore {
    pub fn new(config: CloudinaryConfig) -> Result<Self, StorageError> {
        for (name, value) in [
            ("cloud_name", &config.cloud_name),
            ("api_key", &config.api_key),
            ("api_secret", &config.api_secret),
        ] {
            if value.trim().is_empty() {
                return Err(StorageError::Misconfigured(format!(
                    "cloudinary.{name} is not set"
                )));
            }
        }

        Ok(Self {
            client: reqwest::Client::new(),
            config,
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/v1_1/{}/{path}",
            self.config.api_base.trim_end_matches('/'),
            self.config.cloud_name
        )
    }

    /// Sign request parameters: sorted `key=value` pairs joined by `&`, then the secret.
    fn sign(&self, params: &[(&str, &str)]) -> String {
        signature(params, &self.config.api_secret, self.config.signature_algorithm)
    }
}

fn signature(params: &[(&str, &str)], secret: &str, algorithm: SignatureAlgorithm) -> String {
    let mut sorted: Vec<_> = params.iter().filter(|(_, v)| !v.is_empty()).collect();
    sorted.sort_by(|a, b| a.0.cmp(b.0));

    let mut to_sign = sorted
        .iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join("&");
    to_sign.push_str(secret);

    match algorithm {
        SignatureAlgorithm::Sha1 => hex::encode(Sha1::digest(to_sign.as_bytes())),
        SignatureAlgorithm::Sha256 => hex::encode(Sha256::digest(to_sign.as_bytes())),
    }
}

fn unix_timestamp() -> String {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default()
        .to_string()
}

/// Turn a non-success response into a `Rejected` error carrying Cloudinary's message.
/// The client-declared content type, if it parses. Cloudinary sniffs the
/// bytes anyway, so a garbled header is dropped rather than failing the upload.
fn usable_mime(content_type: Option<&str>) -> Option<&str> {
    let raw = content_type?;
    match raw.parse::<mime_guess::mime::Mime>() {
        Ok(_) => Some(raw),
        Err(e) => {
            debug!(content_type = raw, error = %e, "ignoring unparsable content type");
            None
        }
    }
}

async fn rejection(resp: reqwest::Response) -> StorageError {
    let status = resp.status().as_u16();
    let body = resp.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ErrorEnvelope>(&body)
        .map(|e| e.error.message)
        .unwrap_or(body);
    StorageError::Rejected { status, message }
}

#[async_trait]
impl AssetStore for CloudinaryAssetStore {
    async fn upload(
        &self,
        folder: &str,
        upload: ImageUpload,
    ) -> Result<StoredAsset, StorageError> {
        let timestamp = unix_timestamp();
        let signature = self.sign(&[("folder", folder), ("timestamp", &timestamp)]);

        let mut file = Part::bytes(upload.bytes.to_vec())
            .file_name(upload.file_name.unwrap_or_else(|| "upload".into()));
        if let Some(mime) = usable_mime(upload.content_type.as_deref()) {
            file = file.mime_str(mime)?;
        }

        let form = Form::new()
            .part("file", file)
            .text("api_key", self.config.api_key.clone())
            .text("timestamp", timestamp)
            .text("folder", folder.to_string())
            .text("signature", signature);

        let resp = self
            .client
            .post(self.endpoint("image/upload"))
            .multipart(form)
            .send()
            .await?;
        if !resp.status().is_success() {
            return Err(rejection(resp).await);
        }

        let body: UploadResponse = resp.json().await?;
        debug!(public_id = %body.public_id, "cloudinary upload complete");
        Ok(StoredAsset {
            public_id: body.public_id,
            url: body.secure_url,
        })
    }

    async fn delete(&self, public_id: &str) -> Result<bool, StorageError> {
        let timestamp = unix_timestamp();
        let signature = self.sign(&[("public_id", public_id), ("timestamp", &timestamp)]);

        let resp = self
            .client
            .post(self.endpoint("image/destroy"))
            .form(&[
                ("public_id", public_id),
                ("timestamp", timestamp.as_str()),
                ("api_key", self.config.api_key.as_str()),
                ("signature", signature.as_str()),
            ])
            .send()
            .await?;
        if !resp.status().is_success() {
            return Err(rejection(resp).await);
        }

        let body: DestroyResponse = resp.json().await?;
        match body.result.as_str() {
            "ok" => Ok(true),
            "not found" => Ok(false),
            other => Err(StorageError::Rejected {
                status: 200,
                message: format!("unexpected destroy result: {other}"),
            }),
        }
    }

    async fn exists(&self, public_id: &str) -> Result<bool, StorageError> {
        let resp = self
            .client
            .get(self.endpoint(&format!("resources/image/upload/{public_id}")))
            .basic_auth(&self.config.api_key, Some(&self.config.api_secret))
            .send()
            .await?;

        match resp.status() {
            StatusCode::NOT_FOUND => Ok(false),
            s if s.is_success() => Ok(true),
            _ => Err(rejection(resp).await),
        }
    }
}

use std::collections::HashMap;

use axum::extract::{FromRequest, Multipart, Request};
use axum::http::header::CONTENT_TYPE;
use common::storage::ImageUpload;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use tracing::debug;

use super::json::AppJson;
use crate::error::AppError;

/// Body of an image-bearing create or update.
///
/// Accepts `multipart/form-data` (text parts become fields, file parts become
/// uploads keyed by part name) or a plain JSON object without files.
#[derive(Debug, Default)]
pub struct EntityForm {
    fields: Map<String, Value>,
    files: HashMap<String, ImageUpload>,
}

impl EntityForm {
    /// Take the upload sent under `name`. Empty file parts count as absent.
    pub fn take_file(&mut self, name: &str) -> Option<ImageUpload> {
        self.files.remove(name)
    }

    /// Deserialize the allow-listed fields into a payload. Everything else is dropped.
    pub fn into_payload<T: DeserializeOwned>(self, allowed: &[&str]) -> Result<T, AppError> {
        let mut fields = self.fields;
        fields.retain(|key, _| {
            let keep = allowed.contains(&key.as_str());
            if !keep {
                debug!(field = %key, "ignoring field outside allow-list");
            }
            keep
        });
        for name in self.files.keys() {
            debug!(field = %name, "ignoring unexpected file part");
        }

        serde_json::from_value(Value::Object(fields))
            .map_err(|e| AppError::Validation(e.to_string()))
    }
}

impl EntityForm {
    /// Record a text part. Repeated names collect into an array, in arrival order.
    fn push_text(&mut self, name: String, text: String) {
        match self.fields.get_mut(&name) {
            None => {
                self.fields.insert(name, Value::String(text));
            }
            Some(Value::Array(values)) => values.push(Value::String(text)),
            Some(first) => *first = Value::Array(vec![first.take(), Value::String(text)]),
        }
    }
}

fn is_multipart(req: &Request) -> bool {
    req.headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|ct| ct.starts_with("multipart/form-data"))
}

impl<S> FromRequest<S> for EntityForm
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        if !is_multipart(&req) {
            let AppJson(fields) = AppJson::<Map<String, Value>>::from_request(req, state).await?;
            return Ok(Self {
                fields,
                files: HashMap::new(),
            });
        }

        let mut multipart = Multipart::from_request(req, state)
            .await
            .map_err(|e| AppError::Validation(e.body_text()))?;
        let mut form = Self::default();

        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| AppError::Validation(format!("Multipart error: {e}")))?
        {
            let Some(name) = field.name().map(str::to_owned) else {
                continue;
            };

            if field.file_name().is_some() {
                let file_name = field.file_name().map(str::to_owned);
                let content_type = field.content_type().map(str::to_owned);
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::Validation(format!("Upload read error: {e}")))?;
                if bytes.is_empty() {
                    continue;
                }
                form.files.insert(
                    name,
                    ImageUpload {
                        bytes,
                        file_name,
                        content_type,
                    },
                );
            } else {
                let text = field
                    .text()
                    .await
                    .map_err(|e| AppError::Validation(format!("Failed to read {name}: {e}")))?;
                form.push_text(name, text);
            }
        }

        Ok(form)
    }
}

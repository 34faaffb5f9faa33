use std::fmt::Display;
use std::str::FromStr;

use bson::oid::ObjectId;
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::AppError;

/// Confirmation body returned by delete endpoints.
#[derive(Serialize, utoipa::ToSchema)]
pub struct MessageResponse {
    #[schema(example = "Category deleted")]
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Parse a path id into an ObjectId. A malformed id is a validation failure,
/// distinct from a well-formed id that matches nothing.
pub fn parse_object_id(raw: &str) -> Result<ObjectId, AppError> {
    ObjectId::parse_str(raw)
        .map_err(|_| AppError::Validation(format!("Cast to ObjectId failed for value \"{raw}\"")))
}

/// Either the native JSON value or its text spelling from a form field.
#[derive(Deserialize)]
#[serde(untagged)]
enum Lenient<T> {
    Native(T),
    Text(String),
}

fn parse_text<T, E>(text: &str) -> Result<T, E>
where
    T: FromStr,
    T::Err: Display,
    E: serde::de::Error,
{
    text.trim()
        .parse()
        .map_err(|e| E::custom(format!("invalid value {text:?}: {e}")))
}

/// Serde helper for fields that may arrive as text (multipart) or natively (JSON).
///
/// * `4.5` or `"4.5"` => `4.5`
/// * `true` or `"true"` => `true`
pub fn from_text<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + FromStr,
    T::Err: Display,
{
    match Lenient::<T>::deserialize(deserializer)? {
        Lenient::Native(value) => Ok(value),
        Lenient::Text(text) => parse_text(&text),
    }
}

/// Like [`from_text`] for optional fields. `null` and blank text both mean absent.
pub fn opt_from_text<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + FromStr,
    T::Err: Display,
{
    match Option::<Lenient<T>>::deserialize(deserializer)? {
        None => Ok(None),
        Some(Lenient::Native(value)) => Ok(Some(value)),
        Some(Lenient::Text(text)) if text.trim().is_empty() => Ok(None),
        Some(Lenient::Text(text)) => parse_text(&text).map(Some),
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum TagList {
    List(Vec<String>),
    Text(String),
}

fn split_tags<E: serde::de::Error>(tags: TagList) -> Result<Vec<String>, E> {
    match tags {
        TagList::List(list) => Ok(list),
        TagList::Text(text) if text.trim_start().starts_with('[') => {
            serde_json::from_str(&text).map_err(E::custom)
        }
        TagList::Text(text) => Ok(text
            .split(',')
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_owned)
            .collect()),
    }
}

/// Tags as a JSON array, a JSON array encoded in text, or comma-separated text.
pub fn tags<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    split_tags(TagList::deserialize(deserializer)?)
}

pub fn opt_tags<'de, D>(deserializer: D) -> Result<Option<Vec<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<TagList>::deserialize(deserializer)? {
        Some(tags) => split_tags(tags).map(Some),
        None => Ok(None),
    }
}

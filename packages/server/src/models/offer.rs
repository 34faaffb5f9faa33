use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::shared::{from_text, opt_from_text, opt_tags, tags};
use crate::entity::offer;

#[derive(Debug, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateOfferRequest {
    pub restaurant_id: String,
    #[schema(example = "Happy hour")]
    pub title: String,
    pub description: Option<String>,
    #[serde(deserialize_with = "from_text")]
    #[schema(example = 15)]
    pub discount: f64,
    /// Array of strings or a comma-separated string.
    #[serde(default, deserialize_with = "tags")]
    pub tags: Vec<String>,
    /// RFC 3339 timestamp. Blank text means absent.
    #[serde(default, deserialize_with = "opt_from_text")]
    pub valid_until: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "opt_from_text")]
    pub is_active: Option<bool>,
}

impl CreateOfferRequest {
    pub const FIELDS: &'static [&'static str] = &[
        "restaurantId",
        "title",
        "description",
        "discount",
        "tags",
        "validUntil",
        "isActive",
    ];
}

#[derive(Debug, Default, PartialEq, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateOfferRequest {
    pub restaurant_id: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    #[serde(default, deserialize_with = "opt_from_text")]
    pub discount: Option<f64>,
    #[serde(default, deserialize_with = "opt_tags")]
    pub tags: Option<Vec<String>>,
    #[serde(default, deserialize_with = "opt_from_text")]
    pub valid_until: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "opt_from_text")]
    pub is_active: Option<bool>,
}

impl UpdateOfferRequest {
    pub const FIELDS: &'static [&'static str] = CreateOfferRequest::FIELDS;

    pub fn apply(self, model: &mut offer::Model) {
        if let Some(v) = self.restaurant_id {
            model.restaurant_id = v;
        }
        if let Some(v) = self.title {
            model.title = v;
        }
        if let Some(v) = self.description {
            model.description = v;
        }
        if let Some(v) = self.discount {
            model.discount = v;
        }
        if let Some(v) = self.tags {
            model.tags = v;
        }
        if let Some(v) = self.valid_until {
            model.valid_until = Some(bson::DateTime::from_chrono(v));
        }
        if let Some(v) = self.is_active {
            model.is_active = v;
        }
    }
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OfferResponse {
    #[serde(rename = "_id")]
    pub id: String,
    pub restaurant_id: String,
    pub title: String,
    pub description: String,
    pub discount: f64,
    pub tags: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub valid_until: Option<DateTime<Utc>>,
    pub is_active: bool,
}

impl From<offer::Model> for OfferResponse {
    fn from(m: offer::Model) -> Self {
        Self {
            id: m.id.to_hex(),
            restaurant_id: m.restaurant_id,
            title: m.title,
            description: m.description,
            discount: m.discount,
            tags: m.tags,
            valid_until: m.valid_until.map(bson::DateTime::to_chrono),
            is_active: m.is_active,
        }
    }
}

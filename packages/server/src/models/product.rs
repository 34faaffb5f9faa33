use serde::{Deserialize, Serialize};

use super::shared::{from_text, opt_from_text};
use crate::entity::product;

/// Create payload. The image is sent as the `image` file part.
#[derive(Debug, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateProductRequest {
    pub restaurant_id: String,
    #[schema(example = "Espresso")]
    pub name: String,
    pub description: Option<String>,
    #[serde(deserialize_with = "from_text")]
    #[schema(example = 2.5)]
    pub price: f64,
    pub category_id: String,
    #[serde(default, deserialize_with = "opt_from_text")]
    pub is_available: Option<bool>,
}

impl CreateProductRequest {
    pub const FIELDS: &'static [&'static str] = &[
        "restaurantId",
        "name",
        "description",
        "price",
        "categoryId",
        "isAvailable",
    ];
}

#[derive(Debug, Default, PartialEq, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProductRequest {
    pub restaurant_id: Option<String>,
    pub name: Option<String>,
    pub description: Option<String>,
    #[serde(default, deserialize_with = "opt_from_text")]
    pub price: Option<f64>,
    pub category_id: Option<String>,
    #[serde(default, deserialize_with = "opt_from_text")]
    pub is_available: Option<bool>,
}

impl UpdateProductRequest {
    pub const FIELDS: &'static [&'static str] = CreateProductRequest::FIELDS;

    pub fn apply(self, model: &mut product::Model) {
        if let Some(v) = self.restaurant_id {
            model.restaurant_id = v;
        }
        if let Some(v) = self.name {
            model.name = v;
        }
        if let Some(v) = self.description {
            model.description = v;
        }
        if let Some(v) = self.price {
            model.price = v;
        }
        if let Some(v) = self.category_id {
            model.category_id = v;
        }
        if let Some(v) = self.is_available {
            model.is_available = v;
        }
    }
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductResponse {
    #[serde(rename = "_id")]
    pub id: String,
    pub restaurant_id: String,
    pub name: String,
    pub description: String,
    pub price: f64,
    pub category_id: String,
    pub image: String,
    pub image_public_id: String,
    pub is_available: bool,
}

impl From<product::Model> for ProductResponse {
    fn from(m: product::Model) -> Self {
        Self {
            id: m.id.to_hex(),
            restaurant_id: m.restaurant_id,
            name: m.name,
            description: m.description,
            price: m.price,
            category_id: m.category_id,
            image: m.image,
            image_public_id: m.image_public_id,
            is_available: m.is_available,
        }
    }
}

use serde::{Deserialize, Serialize};

use super::shared::opt_from_text;
use crate::entity::category;

/// Create payload. The image is sent as the `image` file part, never as a field.
#[derive(Debug, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateCategoryRequest {
    #[schema(example = "r1")]
    pub restaurant_id: String,
    #[schema(example = "Drinks")]
    pub name: String,
    #[serde(default, deserialize_with = "opt_from_text")]
    #[schema(example = 1)]
    pub order: Option<i32>,
}

impl CreateCategoryRequest {
    pub const FIELDS: &'static [&'static str] = &["restaurantId", "name", "order"];
}

#[derive(Debug, Default, PartialEq, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCategoryRequest {
    pub restaurant_id: Option<String>,
    pub name: Option<String>,
    #[serde(default, deserialize_with = "opt_from_text")]
    pub order: Option<i32>,
}

impl UpdateCategoryRequest {
    pub const FIELDS: &'static [&'static str] = CreateCategoryRequest::FIELDS;

    pub fn apply(self, model: &mut category::Model) {
        if let Some(restaurant_id) = self.restaurant_id {
            model.restaurant_id = restaurant_id;
        }
        if let Some(name) = self.name {
            model.name = name;
        }
        if let Some(order) = self.order {
            model.order = order;
        }
    }
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CategoryResponse {
    #[serde(rename = "_id")]
    #[schema(example = "665f1c2ab4d8e9a1c2f3b4d5")]
    pub id: String,
    pub restaurant_id: String,
    pub name: String,
    /// Empty when no image is attached.
    pub image: String,
    pub image_public_id: String,
    pub order: i32,
}

impl From<category::Model> for CategoryResponse {
    fn from(m: category::Model) -> Self {
        Self {
            id: m.id.to_hex(),
            restaurant_id: m.restaurant_id,
            name: m.name,
            image: m.image,
            image_public_id: m.image_public_id,
            order: m.order,
        }
    }
}

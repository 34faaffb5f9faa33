use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::entity::restaurant_admin;

#[derive(Debug, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateRestaurantAdminRequest {
    #[schema(example = "owner")]
    pub username: String,
    pub password: String,
    #[schema(example = "Blue Door Cafe")]
    pub restaurant_name: String,
}

impl CreateRestaurantAdminRequest {
    pub const FIELDS: &'static [&'static str] = &["username", "password", "restaurantName"];
}

#[derive(Debug, Default, PartialEq, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateRestaurantAdminRequest {
    pub username: Option<String>,
    pub password: Option<String>,
    pub restaurant_name: Option<String>,
}

impl UpdateRestaurantAdminRequest {
    pub const FIELDS: &'static [&'static str] = CreateRestaurantAdminRequest::FIELDS;

    pub fn apply(self, model: &mut restaurant_admin::Model) {
        if let Some(v) = self.username {
            model.username = v;
        }
        if let Some(v) = self.password {
            model.password = v;
        }
        if let Some(v) = self.restaurant_name {
            model.restaurant_name = v;
        }
    }
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RestaurantAdminResponse {
    #[serde(rename = "_id")]
    pub id: String,
    pub username: String,
    pub password: String,
    pub restaurant_name: String,
    pub created_at: DateTime<Utc>,
}

impl From<restaurant_admin::Model> for RestaurantAdminResponse {
    fn from(m: restaurant_admin::Model) -> Self {
        Self {
            id: m.id.to_hex(),
            username: m.username,
            password: m.password,
            restaurant_name: m.restaurant_name,
            created_at: m.created_at.to_chrono(),
        }
    }
}

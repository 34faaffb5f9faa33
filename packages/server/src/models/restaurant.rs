use serde::{Deserialize, Serialize};

use crate::entity::restaurant;

/// Create payload. The logo is sent as the `logo` file part.
#[derive(Debug, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateRestaurantRequest {
    pub admin_id: String,
    #[schema(example = "Blue Door Cafe")]
    pub name: String,
    pub address: Option<String>,
    pub contact: Option<String>,
}

impl CreateRestaurantRequest {
    pub const FIELDS: &'static [&'static str] = &["adminId", "name", "address", "contact"];
}

#[derive(Debug, Default, PartialEq, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateRestaurantRequest {
    pub admin_id: Option<String>,
    pub name: Option<String>,
    pub address: Option<String>,
    pub contact: Option<String>,
}

impl UpdateRestaurantRequest {
    pub const FIELDS: &'static [&'static str] = CreateRestaurantRequest::FIELDS;

    pub fn apply(self, model: &mut restaurant::Model) {
        if let Some(v) = self.admin_id {
            model.admin_id = v;
        }
        if let Some(v) = self.name {
            model.name = v;
        }
        if let Some(v) = self.address {
            model.address = v;
        }
        if let Some(v) = self.contact {
            model.contact = v;
        }
    }
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RestaurantResponse {
    #[serde(rename = "_id")]
    pub id: String,
    pub admin_id: String,
    pub name: String,
    pub address: String,
    pub contact: String,
    /// Empty when no logo is attached.
    pub logo: String,
    pub logo_public_id: String,
}

impl From<restaurant::Model> for RestaurantResponse {
    fn from(m: restaurant::Model) -> Self {
        Self {
            id: m.id.to_hex(),
            admin_id: m.admin_id,
            name: m.name,
            address: m.address,
            contact: m.contact,
            logo: m.logo,
            logo_public_id: m.logo_public_id,
        }
    }
}

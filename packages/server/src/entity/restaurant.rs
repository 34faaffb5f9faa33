use bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

use crate::images::ImageRef;
use crate::store::CollectionModel;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Model {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub admin_id: String,
    pub name: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub contact: String,
    #[serde(default)]
    pub logo: String,
    #[serde(default)]
    pub logo_public_id: String,
}

impl Model {
    pub fn logo_ref(&self) -> ImageRef {
        ImageRef {
            url: self.logo.clone(),
            public_id: self.logo_public_id.clone(),
        }
    }

    pub fn set_logo(&mut self, logo: ImageRef) {
        self.logo = logo.url;
        self.logo_public_id = logo.public_id;
    }
}

impl CollectionModel for Model {
    const COLLECTION: &'static str = "restaurants";

    fn id(&self) -> ObjectId {
        self.id
    }
}

use bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

use crate::images::ImageRef;
use crate::store::CollectionModel;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Model {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub restaurant_id: String,
    pub name: String,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub image_public_id: String,
    #[serde(default)]
    pub order: i32,
}

impl Model {
    pub fn image_ref(&self) -> ImageRef {
        ImageRef {
            url: self.image.clone(),
            public_id: self.image_public_id.clone(),
        }
    }

    pub fn set_image(&mut self, image: ImageRef) {
        self.image = image.url;
        self.image_public_id = image.public_id;
    }
}

impl CollectionModel for Model {
    const COLLECTION: &'static str = "categories";

    fn id(&self) -> ObjectId {
        self.id
    }
}

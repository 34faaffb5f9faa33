use bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

use crate::store::CollectionModel;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Model {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub username: String,
    /// Stored exactly as submitted.
    pub password: String,
    pub restaurant_name: String,
    pub created_at: bson::DateTime,
}

impl CollectionModel for Model {
    const COLLECTION: &'static str = "restaurantadmins";

    fn id(&self) -> ObjectId {
        self.id
    }
}

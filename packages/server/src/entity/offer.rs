use bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

use crate::store::CollectionModel;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Model {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub restaurant_id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub discount: f64,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub valid_until: Option<bson::DateTime>,
    #[serde(default = "active")]
    pub is_active: bool,
}

fn active() -> bool {
    true
}

impl CollectionModel for Model {
    const COLLECTION: &'static str = "offers";

    fn id(&self) -> ObjectId {
        self.id
    }
}

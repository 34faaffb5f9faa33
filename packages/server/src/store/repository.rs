use std::marker::PhantomData;

use bson::oid::ObjectId;
use serde::Serialize;
use serde::de::DeserializeOwned;

use super::{DocumentStore, StoreError};

/// A document type persisted in its own collection.
pub trait CollectionModel: Serialize + DeserializeOwned + Send + Sync {
    const COLLECTION: &'static str;

    fn id(&self) -> ObjectId;
}

/// Typed access to one collection, converting to and from BSON documents.
pub struct Repository<'a, M> {
    store: &'a dyn DocumentStore,
    _model: PhantomData<fn() -> M>,
}

impl<'a, M: CollectionModel> Repository<'a, M> {
    pub fn new(store: &'a dyn DocumentStore) -> Self {
        Self {
            store,
            _model: PhantomData,
        }
    }

    pub async fn insert(&self, model: &M) -> Result<(), StoreError> {
        let doc = bson::to_document(model)?;
        self.store.insert(M::COLLECTION, doc).await
    }

    pub async fn all(&self) -> Result<Vec<M>, StoreError> {
        self.store
            .find_all(M::COLLECTION)
            .await?
            .into_iter()
            .map(|doc| bson::from_document(doc).map_err(StoreError::from))
            .collect()
    }

    pub async fn find(&self, id: ObjectId) -> Result<Option<M>, StoreError> {
        match self.store.find_by_id(M::COLLECTION, id).await? {
            Some(doc) => Ok(Some(bson::from_document(doc)?)),
            None => Ok(None),
        }
    }

    pub async fn replace(&self, model: &M) -> Result<bool, StoreError> {
        let doc = bson::to_document(model)?;
        self.store
            .replace_by_id(M::COLLECTION, model.id(), doc)
            .await
    }

    pub async fn delete(&self, id: ObjectId) -> Result<bool, StoreError> {
        self.store.delete_by_id(M::COLLECTION, id).await
    }
}

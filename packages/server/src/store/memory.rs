use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use bson::Document;
use bson::oid::ObjectId;

use super::{ConnectionState, DocumentStore, StoreError};

/// In-process document store. Collections keep insertion order.
#[derive(Default)]
pub struct MemoryDocumentStore {
    collections: Mutex<HashMap<String, Vec<Document>>>,
    fail_writes: AtomicBool,
}

impl MemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, Vec<Document>>> {
        self.collections
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Make subsequent inserts and replaces fail as if the database were unreachable.
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::Release);
    }

    fn check_writable(&self) -> Result<(), StoreError> {
        if self.fail_writes.load(Ordering::Acquire) {
            return Err(StoreError::Unavailable("writes are disabled".into()));
        }
        Ok(())
    }

    pub fn count(&self, collection: &str) -> usize {
        self.lock().get(collection).map_or(0, Vec::len)
    }
}

fn has_id(doc: &Document, id: ObjectId) -> bool {
    doc.get_object_id("_id").is_ok_and(|found| found == id)
}

#[async_trait]
impl DocumentStore for MemoryDocumentStore {
    fn state(&self) -> ConnectionState {
        ConnectionState::Connected
    }

    async fn insert(&self, collection: &str, doc: Document) -> Result<(), StoreError> {
        self.check_writable()?;
        let id = doc
            .get_object_id("_id")
            .map_err(|e| StoreError::Unavailable(format!("document has no ObjectId _id: {e}")))?;

        let mut collections = self.lock();
        let docs = collections.entry(collection.to_string()).or_default();
        if docs.iter().any(|d| has_id(d, id)) {
            return Err(StoreError::DuplicateKey(format!("{collection} _id {id}")));
        }
        docs.push(doc);
        Ok(())
    }

    async fn find_all(&self, collection: &str) -> Result<Vec<Document>, StoreError> {
        Ok(self.lock().get(collection).cloned().unwrap_or_default())
    }

    async fn find_by_id(
        &self,
        collection: &str,
        id: ObjectId,
    ) -> Result<Option<Document>, StoreError> {
        Ok(self
            .lock()
            .get(collection)
            .and_then(|docs| docs.iter().find(|d| has_id(d, id)).cloned()))
    }

    async fn replace_by_id(
        &self,
        collection: &str,
        id: ObjectId,
        mut doc: Document,
    ) -> Result<bool, StoreError> {
        self.check_writable()?;
        doc.insert("_id", id);

        let mut collections = self.lock();
        let slot = collections
            .get_mut(collection)
            .and_then(|docs| docs.iter_mut().find(|d| has_id(d, id)));
        match slot {
            Some(existing) => {
                *existing = doc;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete_by_id(&self, collection: &str, id: ObjectId) -> Result<bool, StoreError> {
        let mut collections = self.lock();
        let Some(docs) = collections.get_mut(collection) else {
            return Ok(false);
        };
        let before = docs.len();
        docs.retain(|d| !has_id(d, id));
        Ok(docs.len() != before)
    }
}

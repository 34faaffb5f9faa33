//! Document persistence behind an injectable handle.
//!
//! Handlers only see [`DocumentStore`] through [`Repository`], so the Mongo
//! connection can be swapped for [`memory::MemoryDocumentStore`] in tests.

mod error;
pub mod memory;
pub mod mongo;
mod repository;

use std::sync::atomic::{AtomicU8, Ordering};

use async_trait::async_trait;
use bson::Document;
use bson::oid::ObjectId;
use serde::Serialize;

pub use error::StoreError;
pub use repository::{CollectionModel, Repository};

/// Connectivity of the process-wide document store connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionState {
    Disconnected,
    Connected,
    Connecting,
    Disconnecting,
    Unknown,
}

impl ConnectionState {
    fn from_u8(raw: u8) -> Self {
        match raw {
            0 => Self::Disconnected,
            1 => Self::Connected,
            2 => Self::Connecting,
            3 => Self::Disconnecting,
            _ => Self::Unknown,
        }
    }

    fn as_u8(self) -> u8 {
        match self {
            Self::Disconnected => 0,
            Self::Connected => 1,
            Self::Connecting => 2,
            Self::Disconnecting => 3,
            Self::Unknown => u8::MAX,
        }
    }
}

/// Lock-free holder for a [`ConnectionState`].
#[derive(Debug)]
pub struct ConnectionTracker(AtomicU8);

impl ConnectionTracker {
    pub fn new(state: ConnectionState) -> Self {
        Self(AtomicU8::new(state.as_u8()))
    }

    pub fn get(&self) -> ConnectionState {
        ConnectionState::from_u8(self.0.load(Ordering::Acquire))
    }

    pub fn set(&self, state: ConnectionState) {
        self.0.store(state.as_u8(), Ordering::Release);
    }
}

impl Default for ConnectionTracker {
    fn default() -> Self {
        Self::new(ConnectionState::Disconnected)
    }
}

/// Schemaless collections of documents addressed by `_id`.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    fn state(&self) -> ConnectionState;

    /// Insert a document. The document must carry its own `_id`.
    async fn insert(&self, collection: &str, doc: Document) -> Result<(), StoreError>;

    /// Every document in the collection, in natural order.
    async fn find_all(&self, collection: &str) -> Result<Vec<Document>, StoreError>;

    async fn find_by_id(
        &self,
        collection: &str,
        id: ObjectId,
    ) -> Result<Option<Document>, StoreError>;

    /// Replace the document with the given `_id`. Returns `false` if none matched.
    async fn replace_by_id(
        &self,
        collection: &str,
        id: ObjectId,
        doc: Document,
    ) -> Result<bool, StoreError>;

    /// Returns `false` if no document matched.
    async fn delete_by_id(&self, collection: &str, id: ObjectId) -> Result<bool, StoreError>;

    /// Close the connection. Called once on graceful shutdown.
    async fn shutdown(&self) {}
}

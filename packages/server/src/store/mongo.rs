use std::future::IntoFuture;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use bson::oid::ObjectId;
use bson::{Document, doc};
use futures::TryStreamExt;
use mongodb::event::EventHandler;
use mongodb::event::sdam::SdamEvent;
use mongodb::{Client, Database};
use tracing::{debug, info, warn};

use super::{ConnectionState, ConnectionTracker, DocumentStore, StoreError};

/// MongoDB-backed document store sharing one client for the whole process.
pub struct MongoDocumentStore {
    client: Client,
    db: Database,
    op_timeout: Duration,
    state: Arc<ConnectionTracker>,
}

impl MongoDocumentStore {
    /// `state` is shared with the [`ConnectionMonitor`] registered on the client.
    pub fn new(
        client: Client,
        db: Database,
        op_timeout: Duration,
        state: Arc<ConnectionTracker>,
    ) -> Self {
        Self {
            client,
            db,
            op_timeout,
            state,
        }
    }

    /// Verify the server is reachable. Marks the store connected on success.
    pub async fn connect(&self) -> Result<(), StoreError> {
        self.state.set(ConnectionState::Connecting);
        match self.bounded(self.db.run_command(doc! { "ping": 1 })).await {
            Ok(_) => {
                self.state.set(ConnectionState::Connected);
                info!(database = %self.db.name(), "MongoDB connected");
                Ok(())
            }
            Err(e) => {
                self.state.set(ConnectionState::Disconnected);
                Err(e)
            }
        }
    }

    /// Apply the per-operation timeout the driver itself does not offer.
    async fn bounded<T, F>(&self, op: F) -> Result<T, StoreError>
    where
        F: IntoFuture<Output = mongodb::error::Result<T>>,
    {
        match tokio::time::timeout(self.op_timeout, op).await {
            Ok(result) => result.map_err(StoreError::from),
            Err(_) => {
                warn!(timeout = ?self.op_timeout, "MongoDB operation timed out");
                Err(StoreError::Timeout(self.op_timeout))
            }
        }
    }
}

/// Follows the driver's server monitoring so the reported state tracks the
/// live deployment after startup.
#[derive(Clone)]
pub struct ConnectionMonitor {
    tracker: Arc<ConnectionTracker>,
}

impl ConnectionMonitor {
    pub fn new(tracker: Arc<ConnectionTracker>) -> Self {
        Self { tracker }
    }

    /// Handler for `ClientOptions::sdam_event_handler`.
    pub fn event_handler(&self) -> EventHandler<SdamEvent> {
        let monitor = self.clone();
        EventHandler::callback(move |event| monitor.observe(&event))
    }

    fn observe(&self, event: &SdamEvent) {
        match event {
            SdamEvent::ServerHeartbeatSucceeded(_) => self.on_heartbeat_succeeded(),
            SdamEvent::ServerHeartbeatFailed(e) => {
                debug!(server = %e.server_address, error = %e.failure, "MongoDB heartbeat failed");
                self.on_heartbeat_failed();
            }
            SdamEvent::TopologyClosed(_) => self.on_topology_closed(),
            _ => {}
        }
    }

    // Connecting and Disconnecting belong to connect() and shutdown().
    fn on_heartbeat_succeeded(&self) {
        if matches!(
            self.tracker.get(),
            ConnectionState::Disconnected | ConnectionState::Unknown
        ) {
            self.tracker.set(ConnectionState::Connected);
            info!("MongoDB reachable again");
        }
    }

    fn on_heartbeat_failed(&self) {
        if self.tracker.get() == ConnectionState::Connected {
            self.tracker.set(ConnectionState::Disconnected);
            warn!("MongoDB connection lost");
        }
    }

    fn on_topology_closed(&self) {
        self.tracker.set(ConnectionState::Disconnected);
    }
}

#[async_trait]
impl DocumentStore for MongoDocumentStore {
    fn state(&self) -> ConnectionState {
        self.state.get()
    }

    async fn insert(&self, collection: &str, doc: Document) -> Result<(), StoreError> {
        let coll = self.db.collection::<Document>(collection);
        self.bounded(coll.insert_one(doc)).await?;
        Ok(())
    }

    async fn find_all(&self, collection: &str) -> Result<Vec<Document>, StoreError> {
        let coll = self.db.collection::<Document>(collection);
        self.bounded(async {
            let cursor = coll.find(doc! {}).await?;
            cursor.try_collect::<Vec<Document>>().await
        })
        .await
    }

    async fn find_by_id(
        &self,
        collection: &str,
        id: ObjectId,
    ) -> Result<Option<Document>, StoreError> {
        let coll = self.db.collection::<Document>(collection);
        self.bounded(coll.find_one(doc! { "_id": id })).await
    }

    async fn replace_by_id(
        &self,
        collection: &str,
        id: ObjectId,
        doc: Document,
    ) -> Result<bool, StoreError> {
        let coll = self.db.collection::<Document>(collection);
        let result = self
            .bounded(coll.replace_one(doc! { "_id": id }, doc))
            .await?;
        Ok(result.matched_count > 0)
    }

    async fn delete_by_id(&self, collection: &str, id: ObjectId) -> Result<bool, StoreError> {
        let coll = self.db.collection::<Document>(collection);
        let result = self.bounded(coll.delete_one(doc! { "_id": id })).await?;
        Ok(result.deleted_count > 0)
    }

    async fn shutdown(&self) {
        self.state.set(ConnectionState::Disconnecting);
        self.client.clone().shutdown().await;
        self.state.set(ConnectionState::Disconnected);
        info!("MongoDB connection closed");
    }
}

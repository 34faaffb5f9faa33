use std::sync::Arc;
use std::time::Duration;

use mongodb::Client;
use mongodb::options::ClientOptions;

use crate::config::DatabaseConfig;
use crate::store::mongo::{ConnectionMonitor, MongoDocumentStore};
use crate::store::{ConnectionState, ConnectionTracker, StoreError};

/// Connect to MongoDB once at startup. The returned store is shared for the
/// lifetime of the process.
pub async fn init_db(config: &DatabaseConfig) -> Result<MongoDocumentStore, StoreError> {
    let mut opts = ClientOptions::parse(&config.url).await?;

    opts.server_selection_timeout = Some(Duration::from_secs(config.server_selection_timeout_secs));
    opts.connect_timeout = Some(Duration::from_secs(config.connect_timeout_secs));
    opts.app_name.get_or_insert_with(|| "menu-server".to_string());

    let state = Arc::new(ConnectionTracker::new(ConnectionState::Disconnected));
    opts.sdam_event_handler = Some(ConnectionMonitor::new(state.clone()).event_handler());

    let client = Client::with_options(opts)?;
    let db = client
        .default_database()
        .unwrap_or_else(|| client.database(&config.name));

    let store = MongoDocumentStore::new(
        client,
        db,
        Duration::from_secs(config.socket_timeout_secs),
        state,
    );
    store.connect().await?;

    Ok(store)
}

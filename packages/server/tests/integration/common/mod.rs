use std::net::SocketAddr;
use std::sync::Arc;

use ::common::config::StorageConfig;
use ::common::storage::AssetStore;
use ::common::storage::filesystem::FilesystemAssetStore;
use ::common::storage::memory::MemoryAssetStore;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Method};
use serde_json::Value;

use menu_server::config::{AppConfig, CorsConfig, DatabaseConfig, ServerConfig};
use menu_server::images::RecordingOrphanReporter;
use menu_server::state::AppState;
use menu_server::store::memory::MemoryDocumentStore;
use menu_server::store::{CollectionModel, Repository};

pub mod routes {
    pub const HEALTH: &str = "/";
    pub const CATEGORIES: &str = "/api/categories";
    pub const OFFERS: &str = "/api/offers";
    pub const PRODUCTS: &str = "/api/products";
    pub const RESTAURANT_ADMINS: &str = "/api/restaurant-admins";
    pub const RESTAURANTS: &str = "/api/restaurants";

    pub fn category(id: &str) -> String {
        format!("{CATEGORIES}/{id}")
    }

    pub fn offer(id: &str) -> String {
        format!("{OFFERS}/{id}")
    }

    pub fn product(id: &str) -> String {
        format!("{PRODUCTS}/{id}")
    }

    pub fn restaurant_admin(id: &str) -> String {
        format!("{RESTAURANT_ADMINS}/{id}")
    }

    pub fn restaurant(id: &str) -> String {
        format!("{RESTAURANTS}/{id}")
    }

    pub fn asset(public_id: &str) -> String {
        format!("/assets/{public_id}")
    }
}

/// A running test server over in-memory stores.
pub struct TestApp {
    pub addr: SocketAddr,
    pub client: Client,
    pub db: Arc<MemoryDocumentStore>,
    pub assets: Arc<MemoryAssetStore>,
    pub orphans: Arc<RecordingOrphanReporter>,
}

/// Parsed HTTP response for test assertions.
pub struct TestResponse {
    pub status: u16,
    /// Raw response body as text.
    pub text: String,
    /// Parsed JSON body, or `Null` if the response is not valid JSON.
    pub body: Value,
}

impl TestResponse {
    async fn from_response(res: reqwest::Response) -> Self {
        let status = res.status().as_u16();
        let text = res.text().await.expect("Failed to read response body");
        let body = serde_json::from_str(&text).unwrap_or(Value::Null);
        Self { status, text, body }
    }
}

/// A file part attached to a multipart request.
pub struct FilePart<'a> {
    pub field: &'a str,
    pub file_name: &'a str,
    pub bytes: Vec<u8>,
}

impl<'a> FilePart<'a> {
    pub fn png(field: &'a str, bytes: &[u8]) -> Self {
        Self {
            field,
            file_name: "photo.png",
            bytes: bytes.to_vec(),
        }
    }
}

fn test_config() -> AppConfig {
    AppConfig {
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
            cors: CorsConfig {
                allow_origins: vec![],
                max_age: 3600,
            },
        },
        database: DatabaseConfig {
            url: "mongodb://unused".to_string(),
            name: "restaurant_menu_test".to_string(),
            server_selection_timeout_secs: 30,
            connect_timeout_secs: 30,
            socket_timeout_secs: 45,
        },
        storage: StorageConfig::default(),
    }
}

impl TestApp {
    pub async fn spawn() -> Self {
        let assets = Arc::new(MemoryAssetStore::new());
        Self::start(assets.clone(), assets, None).await
    }

    /// Serve images from a local directory through the filesystem backend.
    pub async fn spawn_with_local_assets(root: &std::path::Path) -> Self {
        let local = Arc::new(
            FilesystemAssetStore::new(root.to_path_buf(), "/assets", 10 * 1024 * 1024)
                .await
                .expect("Failed to create filesystem asset store"),
        );
        Self::start(Arc::new(MemoryAssetStore::new()), local.clone(), Some(local)).await
    }

    async fn start(
        memory_assets: Arc<MemoryAssetStore>,
        assets: Arc<dyn AssetStore>,
        local_assets: Option<Arc<FilesystemAssetStore>>,
    ) -> Self {
        let db = Arc::new(MemoryDocumentStore::new());
        let orphans = Arc::new(RecordingOrphanReporter::default());

        let state = AppState {
            db: db.clone(),
            assets,
            local_assets,
            orphans: orphans.clone(),
            config: test_config(),
        };

        let app = menu_server::build_router(state);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind to random port");
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            addr,
            client: Client::new(),
            db,
            assets: memory_assets,
            orphans,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    /// Write a document straight into the store, bypassing the API.
    pub async fn seed<M: CollectionModel>(&self, model: &M) {
        Repository::<M>::new(self.db.as_ref())
            .insert(model)
            .await
            .expect("Failed to seed document");
    }

    pub async fn get(&self, path: &str) -> TestResponse {
        let res = self
            .client
            .get(self.url(path))
            .send()
            .await
            .expect("Failed to send GET request");

        TestResponse::from_response(res).await
    }

    pub async fn post_json(&self, path: &str, body: &Value) -> TestResponse {
        self.send_json(Method::POST, path, body).await
    }

    pub async fn put_json(&self, path: &str, body: &Value) -> TestResponse {
        self.send_json(Method::PUT, path, body).await
    }

    async fn send_json(&self, method: Method, path: &str, body: &Value) -> TestResponse {
        let res = self
            .client
            .request(method, self.url(path))
            .json(body)
            .send()
            .await
            .expect("Failed to send JSON request");

        TestResponse::from_response(res).await
    }

    pub async fn post_multipart(
        &self,
        path: &str,
        fields: &[(&str, &str)],
        file: Option<FilePart<'_>>,
    ) -> TestResponse {
        self.send_multipart(Method::POST, path, fields, file).await
    }

    pub async fn put_multipart(
        &self,
        path: &str,
        fields: &[(&str, &str)],
        file: Option<FilePart<'_>>,
    ) -> TestResponse {
        self.send_multipart(Method::PUT, path, fields, file).await
    }

    async fn send_multipart(
        &self,
        method: Method,
        path: &str,
        fields: &[(&str, &str)],
        file: Option<FilePart<'_>>,
    ) -> TestResponse {
        let mut form = Form::new();
        for (name, value) in fields {
            form = form.text(name.to_string(), value.to_string());
        }
        if let Some(file) = file {
            let part = Part::bytes(file.bytes)
                .file_name(file.file_name.to_string())
                .mime_str("image/png")
                .expect("Failed to set MIME type");
            form = form.part(file.field.to_string(), part);
        }

        let res = self
            .client
            .request(method, self.url(path))
            .multipart(form)
            .send()
            .await
            .expect("Failed to send multipart request");

        TestResponse::from_response(res).await
    }

    pub async fn delete(&self, path: &str) -> TestResponse {
        let res = self
            .client
            .delete(self.url(path))
            .send()
            .await
            .expect("Failed to send DELETE request");

        TestResponse::from_response(res).await
    }
}

use common::config::StorageConfig;
use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, Environment, File};
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct CorsConfig {
    /// Empty means any origin.
    #[serde(default)]
    pub allow_origins: Vec<String>,
    pub max_age: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub cors: CorsConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    /// Used when the connection string names no default database.
    pub name: String,
    pub server_selection_timeout_secs: u64,
    pub connect_timeout_secs: u64,
    /// Upper bound on any single document store operation.
    pub socket_timeout_secs: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    #[serde(default)]
    pub storage: StorageConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        let s = Self::defaults()?
            // Load from config/config.toml
            .add_source(File::with_name("config/config").required(false))
            // Override from environment (e.g., MENU__STORAGE__BACKEND=filesystem)
            .add_source(
                Environment::with_prefix("MENU")
                    .separator("__")
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("server.cors.allow_origins"),
            )
            // Conventional variables used by hosting platforms win over everything else.
            .set_override_option("server.port", std::env::var("PORT").ok())?
            .set_override_option("database.url", std::env::var("MONGODB_URI").ok())?
            .set_override_option(
                "storage.cloudinary.cloud_name",
                std::env::var("CLOUDINARY_CLOUD_NAME").ok(),
            )?
            .set_override_option(
                "storage.cloudinary.api_key",
                std::env::var("CLOUDINARY_API_KEY").ok(),
            )?
            .set_override_option(
                "storage.cloudinary.api_secret",
                std::env::var("CLOUDINARY_API_SECRET").ok(),
            )?
            .build()?;

        s.try_deserialize()
    }

    fn defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
        Config::builder()
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 5000)?
            .set_default("server.cors.max_age", 3600)?
            .set_default("database.url", "mongodb://localhost:27017")?
            .set_default("database.name", "restaurant_menu")?
            .set_default("database.server_selection_timeout_secs", 30)?
            .set_default("database.connect_timeout_secs", 30)?
            .set_default("database.socket_timeout_secs", 45)
    }
}

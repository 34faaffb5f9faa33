use std::sync::Arc;

use anyhow::Context;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use menu_server::config::AppConfig;
use menu_server::database::init_db;
use menu_server::images::TracingOrphanReporter;
use menu_server::state::{AppState, init_assets};
use menu_server::store::DocumentStore;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = AppConfig::load().context("Failed to load configuration")?;

    let db = match init_db(&config.database).await {
        Ok(db) => Arc::new(db),
        Err(e) => {
            error!(error = %e, "Failed to connect to MongoDB");
            std::process::exit(1);
        }
    };
    info!("Connected to MongoDB");

    let assets = init_assets(&config.storage)
        .await
        .context("Failed to initialize asset storage")?;
    info!(backend = ?config.storage.backend, "Asset storage ready");

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let state = AppState {
        db: db.clone(),
        assets: assets.store,
        local_assets: assets.local,
        orphans: Arc::new(TracingOrphanReporter),
        config,
    };
    let app = menu_server::build_router(state);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    info!("Server running on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    db.shutdown().await;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "Failed to listen for shutdown signal");
    }
    info!("Shutting down");
}

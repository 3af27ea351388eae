//! Concierge application binary - composition root.
//!
//! Ties the crates together into a single executable:
//! 1. Load configuration from TOML
//! 2. Initialize tracing
//! 3. Open SQLite storage and run migrations
//! 4. Wire the capability implementations into the dialogue engine
//! 5. Start the webhook server

use std::path::PathBuf;
use std::sync::Arc;

use concierge_api::{routes, AppState, GatewayClient};
use concierge_core::config::ConciergeConfig;
use concierge_engine::DialogueEngine;
use concierge_storage::{
    Database, SqliteBookingWriter, SqliteCatalogReader, SqliteSessionStore, SqliteTranscriptSink,
};

/// Expand ~ to home directory in a path string.
fn resolve_data_dir(data_dir: &str) -> PathBuf {
    if let Some(rest) = data_dir.strip_prefix("~/") {
        let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
        PathBuf::from(home).join(rest)
    } else {
        PathBuf::from(data_dir)
    }
}

/// Resolve the config file path (CONCIERGE_CONFIG env, or ~/.concierge/config.toml).
fn config_path() -> PathBuf {
    if let Ok(path) = std::env::var("CONCIERGE_CONFIG") {
        return PathBuf::from(path);
    }
    if let Ok(home) = std::env::var("HOME") {
        return PathBuf::from(home).join(".concierge").join("config.toml");
    }
    PathBuf::from("config.toml")
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Tracing.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    tracing::info!("Starting Concierge v{}", env!("CARGO_PKG_VERSION"));

    // Config.
    let config_file = config_path();
    let config = ConciergeConfig::load_or_default(&config_file);
    tracing::info!(path = %config_file.display(), "Configuration loaded");

    // Storage.
    let data_dir = resolve_data_dir(&config.general.data_dir);
    if let Err(e) = std::fs::create_dir_all(&data_dir) {
        tracing::error!(path = %data_dir.display(), error = %e, "Failed to create data directory");
        return Err(e.into());
    }

    let db_path = data_dir.join("concierge.db");
    let db = Arc::new(Database::new(&db_path)?);
    tracing::info!(path = %db_path.display(), "SQLite database opened");

    // Gateway client (outbound sends + media transfer).
    let relay = Arc::new(GatewayClient::new(&config.gateway)?);
    tracing::info!(base_url = %config.gateway.base_url, "Gateway client ready");

    // Dialogue engine over the SQLite-backed capabilities.
    let engine = Arc::new(DialogueEngine::new(
        Arc::new(SqliteSessionStore::new(Arc::clone(&db))),
        Arc::new(SqliteCatalogReader::new(Arc::clone(&db))),
        Arc::new(SqliteBookingWriter::new(Arc::clone(&db))),
        relay,
        Arc::new(SqliteTranscriptSink::new(Arc::clone(&db))),
    ));
    tracing::info!("Dialogue engine ready");

    // Webhook server.
    let state = AppState::new(engine);
    routes::start_server(&config.server, state).await?;

    Ok(())
}

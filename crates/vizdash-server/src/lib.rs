//! Vizdash Server
//!
//! HTTP front for the dashboard engine: filtered record listing, filter
//! options, chart aggregations and the paged table.

#![warn(missing_docs)]

pub mod config;
pub mod handlers;

use config::{DashboardConfig, StoreBackend, StoreConfig};
use handlers::{create_router, AppState, SharedStore};
use std::sync::{Arc, Mutex};
use tokio::net::TcpListener;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;
use vizdash_store::{MemoryStore, SqliteStore, StoreError};

/// Server error
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    /// Record store could not be opened
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Server binding error
    #[error("Failed to bind server: {0}")]
    Bind(#[from] std::io::Error),

    /// Server error
    #[error("Server error: {0}")]
    Server(String),
}

/// Install the global tracing subscriber
///
/// `RUST_LOG` wins over `default_filter`. Logs go to stderr. Calling this
/// twice is harmless.
pub fn init_tracing(default_filter: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Open the configured record store
///
/// A sqlite store with a `seed_file` is populated when empty. A failed seed
/// is logged and the server continues with whatever the database holds.
pub fn open_store(config: &StoreConfig) -> Result<SharedStore, ServerError> {
    match config.backend {
        StoreBackend::Sqlite => {
            let mut store = SqliteStore::open(&config.path)?;
            match &config.seed_file {
                Some(seed) => {
                    if let Err(e) = store.seed_from_json_file(seed) {
                        error!(error = %e, seed = %seed.display(), "Failed to seed database");
                    }
                }
                None => info!("No seed file configured"),
            }
            let store: SharedStore = Arc::new(Mutex::new(store));
            Ok(store)
        }
        StoreBackend::Json => {
            let store = MemoryStore::from_json_file(&config.path)?;
            let store: SharedStore = Arc::new(Mutex::new(store));
            Ok(store)
        }
    }
}

/// Start the dashboard HTTP server
///
/// Opens the store, builds the router and serves until Ctrl-C.
pub async fn start_server(config: DashboardConfig) -> Result<(), ServerError> {
    info!("Starting Vizdash server");
    info!("Bind address: {}", config.bind_addr());
    info!(
        "Store: {:?} at {}",
        config.store.backend,
        config.store.path.display()
    );

    let store = open_store(&config.store)?;
    let state = AppState::from_shared(store).with_config(&config);
    let app = create_router(state);

    let listener = TcpListener::bind(&config.bind_addr()).await?;
    info!("Server listening on {}", config.bind_addr());

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| ServerError::Server(e.to_string()))?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}

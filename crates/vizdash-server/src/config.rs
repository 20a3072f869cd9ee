//! Configuration file parsing for the dashboard server.
//!
//! Loads settings from TOML files including bind address, log filter, cache
//! lifetime, table page size and the record store backend.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;
use vizdash_domain::table::DEFAULT_PAGE_SIZE;

/// Configuration error
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read config file
    #[error("Failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    /// Failed to parse TOML
    #[error("Failed to parse config TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// Missing required field
    #[error("Missing required configuration field: {0}")]
    MissingField(String),

    /// Field present but unusable
    #[error("Invalid configuration value for {field}: {reason}")]
    InvalidValue {
        /// Offending field
        field: String,
        /// Why it was rejected
        reason: String,
    },
}

/// Server configuration loaded from TOML
#[derive(Debug, Clone, Deserialize)]
pub struct DashboardConfig {
    /// Bind address (e.g., "127.0.0.1")
    pub bind_address: String,

    /// Bind port (e.g., 3000)
    pub bind_port: u16,

    /// Default tracing filter; `RUST_LOG` takes precedence
    #[serde(default = "default_log_filter")]
    pub log_filter: String,

    /// `max-age` of the Cache-Control header on data responses
    #[serde(default = "default_cache_max_age")]
    pub cache_max_age_secs: u64,

    /// Table rows per page when the request does not say
    #[serde(default = "default_page_size")]
    pub default_page_size: usize,

    /// Record store
    pub store: StoreConfig,
}

/// Which medium backs the record store
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    /// SQLite database, optionally seeded from a dataset file
    #[default]
    Sqlite,
    /// Dataset file loaded into memory
    Json,
}

/// Record store configuration
#[derive(Debug, Clone, Deserialize)]
pub struct StoreConfig {
    /// Backend kind (default: sqlite)
    #[serde(default)]
    pub backend: StoreBackend,

    /// Database file (sqlite) or dataset file (json)
    pub path: PathBuf,

    /// Dataset used to populate an empty sqlite store
    #[serde(default)]
    pub seed_file: Option<PathBuf>,
}

fn default_log_filter() -> String {
    "info".to_string()
}

/// Default cache lifetime: 1 minute
fn default_cache_max_age() -> u64 {
    60
}

fn default_page_size() -> usize {
    DEFAULT_PAGE_SIZE
}

impl DashboardConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let config: DashboardConfig = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Check values serde cannot check
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.store.path.as_os_str().is_empty() {
            return Err(ConfigError::MissingField("store.path".to_string()));
        }
        if self.default_page_size == 0 {
            return Err(ConfigError::InvalidValue {
                field: "default_page_size".to_string(),
                reason: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }

    /// Configuration for local development
    ///
    /// SQLite database in the working directory, seeded from `jsondata.json`.
    pub fn default_local_config() -> Self {
        DashboardConfig {
            bind_address: "127.0.0.1".to_string(),
            bind_port: 3000,
            log_filter: default_log_filter(),
            cache_max_age_secs: default_cache_max_age(),
            default_page_size: default_page_size(),
            store: StoreConfig {
                backend: StoreBackend::Sqlite,
                path: PathBuf::from("data-visual-dashboard.db"),
                seed_file: Some(PathBuf::from("jsondata.json")),
            },
        }
    }

    /// Get the full bind address (address:port)
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.bind_address, self.bind_port)
    }
}

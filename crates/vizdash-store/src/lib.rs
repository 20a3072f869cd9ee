//! VizDash Storage Layer
//!
//! Implements the `RecordStore` trait over two backing media:
//!
//! - [`SqliteStore`]: SQLite database, one JSON row per record, seeded once
//!   from the bundled dataset file
//! - [`MemoryStore`]: the dataset file loaded into memory at startup
//!
//! # Examples
//!
//! ```no_run
//! use vizdash_store::SqliteStore;
//!
//! let mut store = SqliteStore::open(":memory:").unwrap();
//! store.seed_from_json_file("jsondata.json").unwrap();
//! // Store is now ready for queries
//! ```

#![warn(missing_docs)]

pub mod dataset;
pub mod memory;

pub use memory::MemoryStore;

use rusqlite::{params, Connection};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};
use vizdash_domain::traits::RecordStore;
use vizdash_domain::Record;

/// Errors that can occur during storage operations
#[derive(Error, Debug)]
pub enum StoreError {
    /// The backing medium cannot be opened or read
    #[error("Store unavailable: {0}")]
    Unavailable(String),

    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Dataset file could not be read
    #[error("Failed to read dataset {path}: {source}")]
    Io {
        /// File that failed
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// Dataset or stored row is not valid JSON
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Invalid data format
    #[error("Invalid data: {0}")]
    InvalidData(String),
}

impl StoreError {
    /// Whether the failure means the backing medium is unreachable
    pub fn is_unavailable(&self) -> bool {
        matches!(self, StoreError::Unavailable(_) | StoreError::Io { .. })
    }
}

/// SQLite-based implementation of RecordStore
///
/// Records are kept as JSON text so every original field survives the round
/// trip; the autoincrement id preserves dataset order.
///
/// # Thread Safety
///
/// SQLite connections are not thread-safe. Share a SqliteStore behind a mutex.
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Open (or create) a SqliteStore at the given database path
    ///
    /// Use `:memory:` for an in-memory database (useful for testing).
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let path = path.as_ref();
        let conn = Connection::open(path).map_err(|e| {
            StoreError::Unavailable(format!("cannot open {}: {}", path.display(), e))
        })?;
        let store = Self { conn };
        store.initialize_schema()?;
        debug!("Opened record store at {}", path.display());
        Ok(store)
    }

    /// Initialize the database schema
    fn initialize_schema(&self) -> Result<(), StoreError> {
        let schema = include_str!("schema.sql");
        self.conn.execute_batch(schema)?;
        Ok(())
    }

    /// Append records in one transaction
    pub fn insert_records(&mut self, records: &[Record]) -> Result<usize, StoreError> {
        let tx = self.conn.transaction()?;
        {
            let mut stmt = tx.prepare("INSERT INTO records (body) VALUES (?1)")?;
            for record in records {
                let body = serde_json::to_string(record)?;
                stmt.execute(params![body])?;
            }
        }
        tx.commit()?;
        Ok(records.len())
    }

    /// One-time initialization from the bundled dataset
    ///
    /// Inserts the file's records only when the store is empty and returns
    /// how many were inserted; an already-populated store is left untouched
    /// and yields 0.
    pub fn seed_from_json_file<P: AsRef<Path>>(&mut self, path: P) -> Result<usize, StoreError> {
        let existing = self.count()?;
        if existing > 0 {
            debug!("Record store already holds {} records, skipping seed", existing);
            return Ok(0);
        }

        let records = dataset::load_json_file(path.as_ref())?;
        if records.is_empty() {
            return Ok(0);
        }

        let inserted = self.insert_records(&records)?;
        info!("Initialized database with {} records", inserted);
        Ok(inserted)
    }
}

impl RecordStore for SqliteStore {
    type Error = StoreError;

    fn list_all(&self) -> Result<Vec<Record>, Self::Error> {
        let mut stmt = self.conn.prepare("SELECT id, body FROM records ORDER BY id")?;

        let rows = stmt
            .query_map([], |row| Ok((row.get::<_, i64>(0)?, row.get::<_, String>(1)?)))?
            .collect::<Result<Vec<_>, _>>()?;

        rows.into_iter()
            .map(|(id, body)| {
                serde_json::from_str::<Record>(&body)
                    .map_err(|e| StoreError::InvalidData(format!("record {}: {}", id, e)))
            })
            .collect()
    }

    fn count(&self) -> Result<usize, Self::Error> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM records", [], |row| row.get(0))?;
        Ok(count as usize)
    }
}

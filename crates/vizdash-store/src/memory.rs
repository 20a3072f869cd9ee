//! In-memory record store
//!
//! Holds the whole dataset in a vector, loaded once when the store is
//! opened. Used for the file-backed deployment and as a test double.

use crate::{dataset, StoreError};
use std::path::Path;
use tracing::info;
use vizdash_domain::traits::RecordStore;
use vizdash_domain::Record;

/// Read-only store over an owned record vector
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    records: Vec<Record>,
}

impl MemoryStore {
    /// Wrap an existing record vector
    pub fn new(records: Vec<Record>) -> Self {
        Self { records }
    }

    /// Load a dataset file
    ///
    /// A missing or unreadable file is reported as [`StoreError::Unavailable`].
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let path = path.as_ref();
        let records = dataset::load_json_file(path).map_err(|e| match e {
            StoreError::Io { path, source } => {
                StoreError::Unavailable(format!("cannot read {}: {}", path.display(), source))
            }
            other => other,
        })?;
        info!("Loaded {} records from {}", records.len(), path.display());
        Ok(Self::new(records))
    }
}

impl RecordStore for MemoryStore {
    type Error = StoreError;

    fn list_all(&self) -> Result<Vec<Record>, Self::Error> {
        Ok(self.records.clone())
    }

    fn count(&self) -> Result<usize, Self::Error> {
        Ok(self.records.len())
    }
}

//! Trait definitions for external interactions
//!
//! These traits define the boundary between the engine and whatever backs
//! the record collection. Implementations live in other crates.

use crate::{FilterSpec, Record};

/// Read access to the record collection
///
/// Implemented by the infrastructure layer (vizdash-store)
pub trait RecordStore {
    /// Error type for store operations
    type Error;

    /// Every record, in storage order
    fn list_all(&self) -> Result<Vec<Record>, Self::Error>;

    /// Records matching a filter, in storage order
    ///
    /// The default filters `list_all` in memory so every backend shares the
    /// exact matching rules of [`FilterSpec::matches`].
    fn list_filtered(&self, spec: &FilterSpec) -> Result<Vec<Record>, Self::Error> {
        Ok(spec.retain(self.list_all()?))
    }

    /// Number of stored records
    fn count(&self) -> Result<usize, Self::Error> {
        Ok(self.list_all()?.len())
    }
}

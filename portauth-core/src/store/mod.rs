//! Backing key/value storage.
//!
//! This module provides:
//! - [`KeyValueStore`] - Trait for the ordered string map under a credential directory
//! - [`MemoryStore`] - In-memory implementation for testing and embedding
//! - [`FileStore`] - JSON file implementation
//!
//! # Key Convention
//!
//! The credential directory uses `"0"` for the default record, the decimal
//! port number for every other record, and `"AutoUpdate"` for the
//! automatic-update flag. Stores themselves impose no meaning on keys.

use std::path::PathBuf;

use thiserror::Error;

mod file;
mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

/// Error type for backing store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Nothing has been persisted at the store location yet.
    #[error("no store found at {path:?}")]
    Missing { path: PathBuf },

    /// I/O error reading or writing the store.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The persisted data uses a format version this build cannot read.
    #[error("unsupported store format version {found}")]
    UnsupportedVersion { found: u32 },

    /// Configuration directory not available.
    #[error("configuration directory not available")]
    ConfigDirUnavailable,
}

/// Ordered string-to-string map with explicit persistence.
///
/// Reads and writes operate on the in-memory map; [`load`](Self::load) and
/// [`save`](Self::save) move it to and from durable storage.
pub trait KeyValueStore {
    /// Replace the in-memory map with the persisted one.
    ///
    /// Returns [`StoreError::Missing`] if nothing has been persisted; the map
    /// is left empty in that case.
    fn load(&mut self) -> Result<(), StoreError>;

    /// Persist the in-memory map.
    fn save(&self) -> Result<(), StoreError>;

    /// Value stored under `key`.
    fn get(&self, key: &str) -> Option<&str>;

    /// Store `value` under `key`, overwriting any existing value.
    fn set(&mut self, key: &str, value: &str);

    /// Remove `key`. Returns whether it was present.
    fn remove(&mut self, key: &str) -> bool;

    /// All `(key, value)` pairs in ascending key order.
    fn entries(&self) -> Box<dyn Iterator<Item = (&str, &str)> + '_>;

    /// Check if a key exists without retrieving the value.
    fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }
}

//! Storage module for string-keyed backends
//!
//! Every durable piece of reader state lives under a string key as JSON text.
//! Two backends are provided:
//!
//! - [`MemoryStore`] - in-process map, insertion ordered
//! - [`FileStore`] - one file per key in a directory

mod file;
mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

use thiserror::Error;

/// Storage-specific errors
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Stored text under a key could not be parsed
    #[error("Corrupt entry at {key}: {source}")]
    Corrupt {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Generic string-keyed text store
pub trait KeyValueStore: Send + Sync {
    /// Read the value stored under `key`
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Store `value` under `key`, replacing any previous value
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Remove `key`; returns whether it existed
    fn remove(&self, key: &str) -> Result<bool, StorageError>;

    /// Enumerate all keys in the store's enumeration order
    fn keys(&self) -> Result<Vec<String>, StorageError>;
}

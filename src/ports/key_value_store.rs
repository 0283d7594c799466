//! Durable key-value storage port.
//!
//! Mirrors a browser-style storage area: reads take a list of keys and return
//! whatever subset exists, writes merge a record into the area. Credentials
//! and control-panel settings live in separate instances and never share keys.

use async_trait::async_trait;
use thiserror::Error;

/// A set of key/value pairs read from or written to storage.
pub type StorageRecord = serde_json::Map<String, serde_json::Value>;

/// Port for durable key-value storage.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Reads the requested keys. Missing keys are simply absent from the record.
    async fn get(&self, keys: &[&str]) -> Result<StorageRecord, StorageError>;

    /// Merges the record into storage, overwriting existing keys.
    async fn set(&self, record: StorageRecord) -> Result<(), StorageError>;
}

/// Storage failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StorageError {
    #[error("Storage I/O error: {0}")]
    Io(String),

    #[error("Storage contents are corrupt: {0}")]
    Corrupt(String),

    #[error("Failed to serialize storage record: {0}")]
    Serialization(String),
}

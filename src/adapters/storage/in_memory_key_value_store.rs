//! In-memory key-value store for tests and ephemeral sessions.

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::ports::{KeyValueStore, StorageError, StorageRecord};

/// Key-value store backed by a map in process memory.
#[derive(Debug, Default)]
pub struct InMemoryKeyValueStore {
    entries: RwLock<StorageRecord>,
}

impl InMemoryKeyValueStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-populated with a record.
    pub fn with_record(record: StorageRecord) -> Self {
        Self {
            entries: RwLock::new(record),
        }
    }

    /// Returns a copy of everything stored (for test assertions).
    pub async fn snapshot(&self) -> StorageRecord {
        self.entries.read().await.clone()
    }
}

#[async_trait]
impl KeyValueStore for InMemoryKeyValueStore {
    async fn get(&self, keys: &[&str]) -> Result<StorageRecord, StorageError> {
        let entries = self.entries.read().await;
        Ok(keys
            .iter()
            .filter_map(|key| entries.get(*key).map(|v| (key.to_string(), v.clone())))
            .collect())
    }

    async fn set(&self, record: StorageRecord) -> Result<(), StorageError> {
        self.entries.write().await.extend(record);
        Ok(())
    }
}

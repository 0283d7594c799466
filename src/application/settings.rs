//! Control-panel settings persisted in the sync storage area.

use secrecy::{ExposeSecret, Secret};
use serde_json::Value;
use std::sync::Arc;

use crate::ports::{KeyValueStore, StorageError, StorageRecord};

pub const API_ENDPOINT_KEY: &str = "apiEndpoint";
pub const API_KEY_KEY: &str = "apiKey";

/// User-editable settings.
#[derive(Debug, Clone)]
pub struct Settings {
    pub api_endpoint: String,
    pub api_key: Option<Secret<String>>,
}

/// Reads and writes [`Settings`], falling back to the configured endpoint.
pub struct SettingsRepository {
    store: Arc<dyn KeyValueStore>,
    default_endpoint: String,
}

impl SettingsRepository {
    pub fn new(store: Arc<dyn KeyValueStore>, default_endpoint: impl Into<String>) -> Self {
        Self {
            store,
            default_endpoint: default_endpoint.into(),
        }
    }

    pub fn default_endpoint(&self) -> &str {
        &self.default_endpoint
    }

    pub async fn load(&self) -> Result<Settings, StorageError> {
        let record = self.store.get(&[API_ENDPOINT_KEY, API_KEY_KEY]).await?;

        let api_endpoint = record
            .get(API_ENDPOINT_KEY)
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .unwrap_or(self.default_endpoint.as_str())
            .to_string();
        let api_key = record
            .get(API_KEY_KEY)
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
            .map(|s| Secret::new(s.to_string()));

        Ok(Settings {
            api_endpoint,
            api_key,
        })
    }

    pub async fn save(&self, settings: &Settings) -> Result<(), StorageError> {
        let mut record = StorageRecord::new();
        record.insert(
            API_ENDPOINT_KEY.to_string(),
            Value::String(settings.api_endpoint.clone()),
        );
        record.insert(
            API_KEY_KEY.to_string(),
            Value::String(
                settings
                    .api_key
                    .as_ref()
                    .map(|k| k.expose_secret().clone())
                    .unwrap_or_default(),
            ),
        );
        self.store.set(record).await
    }
}

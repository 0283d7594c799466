//! Durable storage locations

use serde::Deserialize;
use std::path::PathBuf;

/// Where storage areas and the cookie jar live on disk
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// Directory holding the storage area files
    #[serde(default = "default_data_dir")]
    pub data_dir: String,

    /// Netscape cookies.txt export used as the cookie jar
    pub cookie_jar_path: Option<String>,
}

impl StorageConfig {
    /// Storage area for captured credentials
    pub fn local_area_path(&self) -> PathBuf {
        PathBuf::from(&self.data_dir).join("local.json")
    }

    /// Storage area for control-panel settings
    pub fn sync_area_path(&self) -> PathBuf {
        PathBuf::from(&self.data_dir).join("sync.json")
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            cookie_jar_path: None,
        }
    }
}

fn default_data_dir() -> String {
    "./data".to_string()
}

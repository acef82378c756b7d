use serde::{Deserialize, Serialize};

use super::task::Priority;

/// Default storage key for the tab collection
pub const DEFAULT_STORAGE_KEY: &str = "tabs";

/// Configuration from config.toml
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub tasks: TaskConfig,
    #[serde(default)]
    pub list: ListConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Key the tab collection is stored under
    #[serde(default = "default_storage_key")]
    pub key: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        StorageConfig {
            key: default_storage_key(),
        }
    }
}

fn default_storage_key() -> String {
    DEFAULT_STORAGE_KEY.to_string()
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskConfig {
    /// Priority given to new tasks when none is specified
    #[serde(default)]
    pub default_priority: Priority,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListConfig {
    /// Status filter applied by `list` when none is given ("all", "pending", "completed")
    #[serde(default = "default_status")]
    pub default_status: String,
}

impl Default for ListConfig {
    fn default() -> Self {
        ListConfig {
            default_status: default_status(),
        }
    }
}

fn default_status() -> String {
    "all".to_string()
}

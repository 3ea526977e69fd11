//! Storage configuration

use super::*;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Storage configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Deadline for every store call, in seconds
    #[serde(default = "default_query_timeout")]
    pub query_timeout_secs: u64,
    /// Grant `movies:write` to newly registered users
    #[serde(default)]
    pub grant_write_on_register: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            query_timeout_secs: default_query_timeout(),
            grant_write_on_register: false,
        }
    }
}

impl StorageConfig {
    pub fn query_timeout(&self) -> Duration {
        Duration::from_secs(self.query_timeout_secs)
    }

    /// Validate storage configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.query_timeout_secs == 0 {
            return Err("Query timeout cannot be 0".to_string());
        }
        Ok(())
    }
}

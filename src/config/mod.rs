//! Configuration management for the API
//!
//! Configuration is read from a YAML file, overlaid with `EIGA_*`
//! environment variables and validated before the server starts.

mod loader;
pub mod models;

pub use models::*;

use crate::utils::error::{ApiError, Result};
use std::path::Path;
use tracing::{debug, info};

/// Main configuration struct for the API
#[derive(Debug, Clone, Default)]
pub struct Config {
    pub api: ApiConfig,
}

impl Config {
    /// Load configuration from file, then apply environment overrides
    pub async fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        info!("Loading configuration from: {:?}", path);

        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| ApiError::Config(format!("Failed to read config file: {}", e)))?;

        let mut api: ApiConfig = serde_yaml::from_str(&content)
            .map_err(|e| ApiError::Config(format!("Failed to parse config: {}", e)))?;
        api.apply_env()?;

        let config = Self { api };
        config.validate()?;

        debug!("Configuration loaded successfully");
        Ok(config)
    }

    /// Load configuration from environment variables only
    pub fn from_env() -> Result<Self> {
        info!("Loading configuration from environment variables");

        let config = Self {
            api: ApiConfig::from_env()?,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn server(&self) -> &ServerConfig {
        &self.api.server
    }

    pub fn limiter(&self) -> &RateLimitConfig {
        &self.api.limiter
    }

    pub fn storage(&self) -> &StorageConfig {
        &self.api.storage
    }

    pub fn mail(&self) -> &MailConfig {
        &self.api.mail
    }

    /// Validate the entire configuration
    pub fn validate(&self) -> Result<()> {
        debug!("Validating configuration");
        self.api.validate().map_err(ApiError::Config)
    }

    /// Convert to YAML string
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(&self.api)
            .map_err(|e| ApiError::Config(format!("Failed to serialize config to YAML: {}", e)))
    }
}

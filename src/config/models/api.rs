//! Top-level API configuration

use super::*;
use serde::{Deserialize, Serialize};

/// Complete API configuration as read from `config/eiga.yaml`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApiConfig {
    /// HTTP server settings
    #[serde(default)]
    pub server: ServerConfig,
    /// Admission control settings
    #[serde(default)]
    pub limiter: RateLimitConfig,
    /// Store settings
    #[serde(default)]
    pub storage: StorageConfig,
    /// Outgoing mail settings
    #[serde(default)]
    pub mail: MailConfig,
}

impl ApiConfig {
    /// Validate every section, prefixing errors with the section name
    pub fn validate(&self) -> Result<(), String> {
        self.server
            .validate()
            .map_err(|e| format!("Server config error: {}", e))?;
        self.server
            .cors
            .validate()
            .map_err(|e| format!("CORS config error: {}", e))?;
        self.limiter
            .validate()
            .map_err(|e| format!("Limiter config error: {}", e))?;
        self.storage
            .validate()
            .map_err(|e| format!("Storage config error: {}", e))?;
        self.mail
            .validate()
            .map_err(|e| format!("Mail config error: {}", e))?;
        Ok(())
    }

    /// Whether the server runs in the production environment
    pub fn is_production(&self) -> bool {
        self.server.environment == "production"
    }
}

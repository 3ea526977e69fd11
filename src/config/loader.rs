//! Environment overrides for file-based configuration

use super::models::*;
use crate::utils::error::{ApiError, Result};
use std::env;
use std::str::FromStr;
use tracing::debug;

/// Parse an environment variable, returning `None` when it is unset
fn env_parse<T>(name: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|e| ApiError::Config(format!("Invalid {}: {}", name, e))),
        Err(_) => Ok(None),
    }
}

impl ApiConfig {
    /// Load configuration from environment variables on top of defaults
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();
        config.apply_env()?;
        Ok(config)
    }

    /// Overlay `EIGA_*` environment variables onto this configuration
    pub fn apply_env(&mut self) -> Result<()> {
        debug!("Applying environment overrides");

        if let Ok(host) = env::var("EIGA_HOST") {
            self.server.host = host;
        }
        if let Some(port) = env_parse("EIGA_PORT")? {
            self.server.port = port;
        }
        if let Ok(environment) = env::var("EIGA_ENV") {
            self.server.environment = environment;
        }
        if let Some(workers) = env_parse("EIGA_WORKERS")? {
            self.server.workers = Some(workers);
        }

        if let Some(enabled) = env_parse("EIGA_LIMITER_ENABLED")? {
            self.limiter.enabled = enabled;
        }
        if let Some(rps) = env_parse("EIGA_LIMITER_RPS")? {
            self.limiter.rps = rps;
        }
        if let Some(burst) = env_parse("EIGA_LIMITER_BURST")? {
            self.limiter.burst = burst;
        }

        if let Ok(host) = env::var("EIGA_SMTP_HOST") {
            self.mail.host = host;
        }
        if let Some(port) = env_parse("EIGA_SMTP_PORT")? {
            self.mail.port = port;
        }
        if let Ok(username) = env::var("EIGA_SMTP_USERNAME") {
            self.mail.username = username;
        }
        if let Ok(password) = env::var("EIGA_SMTP_PASSWORD") {
            self.mail.password = password;
        }
        if let Ok(sender) = env::var("EIGA_SMTP_SENDER") {
            self.mail.sender = sender;
        }

        Ok(())
    }
}

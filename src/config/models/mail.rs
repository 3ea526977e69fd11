//! Mail configuration

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Mail delivery configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MailConfig {
    /// SMTP host
    #[serde(default = "default_smtp_host")]
    pub host: String,
    /// SMTP port
    #[serde(default = "default_smtp_port")]
    pub port: u16,
    /// SMTP username
    #[serde(default)]
    pub username: String,
    /// SMTP password
    #[serde(default)]
    pub password: String,
    /// Sender address, e.g. `Eiga <no-reply@eiga.local>`
    #[serde(default = "default_sender")]
    pub sender: String,
    /// Delivery attempts before giving up
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    /// Pause between delivery attempts, in milliseconds
    #[serde(default = "default_retry_delay_ms")]
    pub retry_delay_ms: u64,
}

impl Default for MailConfig {
    fn default() -> Self {
        Self {
            host: default_smtp_host(),
            port: default_smtp_port(),
            username: String::new(),
            password: String::new(),
            sender: default_sender(),
            max_attempts: default_max_attempts(),
            retry_delay_ms: default_retry_delay_ms(),
        }
    }
}

impl MailConfig {
    pub fn retry_delay(&self) -> Duration {
        Duration::from_millis(self.retry_delay_ms)
    }

    /// Validate mail configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.max_attempts == 0 {
            return Err("Mail max_attempts cannot be 0".to_string());
        }
        if !self.sender.contains('@') {
            return Err(format!("Mail sender is not an address: {}", self.sender));
        }
        Ok(())
    }
}

fn default_smtp_host() -> String {
    "localhost".to_string()
}

fn default_smtp_port() -> u16 {
    25
}

fn default_sender() -> String {
    "Eiga <no-reply@eiga.local>".to_string()
}

fn default_max_attempts() -> u32 {
    3
}

fn default_retry_delay_ms() -> u64 {
    1000
}

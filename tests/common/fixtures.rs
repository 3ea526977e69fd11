//! Test fixtures and data factories

use async_trait::async_trait;
use eiga_api::config::Config;
use eiga_api::server::AppState;
use eiga_api::services::Mailer;
use eiga_api::services::mailer::{MailError, Template};
use eiga_api::storage::StorageLayer;
use parking_lot::Mutex;
use serde_json::Value;
use std::sync::Arc;

/// Factory for test configurations
pub struct ConfigFactory;

impl ConfigFactory {
    /// Admission control off, everything else default
    pub fn unlimited() -> Config {
        let mut config = Config::default();
        config.api.limiter.enabled = false;
        config.api.limiter.global.enabled = false;
        config
    }

    /// Per-client limiting with the given burst; the global bucket is off
    pub fn per_client(rps: f64, burst: u32) -> Config {
        let mut config = Config::default();
        config.api.limiter.enabled = true;
        config.api.limiter.rps = rps;
        config.api.limiter.burst = burst;
        config.api.limiter.global.enabled = false;
        config
    }

    /// Settings for a real listener that shuts down quickly
    pub fn live() -> Config {
        let mut config = Self::unlimited();
        config.api.server.host = "127.0.0.1".to_string();
        config.api.server.workers = Some(1);
        config.api.server.shutdown_timeout_secs = 1;
        config
    }
}

/// A message handed to [`RecordingMailer`]
#[derive(Debug, Clone)]
pub struct SentMail {
    pub recipient: String,
    pub template: Template,
    pub data: Value,
}

/// Mailer that keeps every message in memory
#[derive(Debug, Default)]
pub struct RecordingMailer {
    sent: Mutex<Vec<SentMail>>,
}

impl RecordingMailer {
    pub fn sent(&self) -> Vec<SentMail> {
        self.sent.lock().clone()
    }

    /// Activation token from the last welcome mail sent to `recipient`
    pub fn activation_token_for(&self, recipient: &str) -> Option<String> {
        self.sent
            .lock()
            .iter()
            .rev()
            .find(|m| m.recipient == recipient && m.template == Template::UserWelcome)
            .and_then(|m| m.data["activationToken"].as_str().map(str::to_string))
    }
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn send(&self, recipient: &str, template: Template, data: Value) -> Result<(), MailError> {
        self.sent.lock().push(SentMail {
            recipient: recipient.to_string(),
            template,
            data,
        });
        Ok(())
    }
}

/// Application state wired to a [`RecordingMailer`]
pub struct TestApp {
    pub state: AppState,
    pub mailer: Arc<RecordingMailer>,
}

impl TestApp {
    /// Must be called inside a runtime
    pub fn new(config: Config) -> Self {
        let storage = StorageLayer::in_memory(config.storage());
        let mailer = Arc::new(RecordingMailer::default());
        let state = AppState::with_parts(config, storage, mailer.clone());
        Self { state, mailer }
    }
}

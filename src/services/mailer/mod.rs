//! Outgoing mail
//!
//! Handlers never call a [`Mailer`] directly on the request path; sends are
//! launched through the background task tracker.

mod template;
mod transport;


pub use template::{Message, Template};
pub use transport::{LogTransport, Transport};

use crate::config::MailConfig;
use async_trait::async_trait;
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;
use tracing::{info, warn};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MailError {
    #[error("template data is missing field {0}")]
    MissingField(&'static str),

    #[error("delivery failed: {0}")]
    Delivery(String),

    #[error("giving up after {attempts} attempts: {last}")]
    Exhausted { attempts: u32, last: String },
}

#[async_trait]
pub trait Mailer: Send + Sync {
    /// Render `template` with `data` and deliver it to `recipient`
    async fn send(&self, recipient: &str, template: Template, data: Value) -> Result<(), MailError>;
}

/// Renders templates and hands them to a [`Transport`], retrying failed
/// deliveries
pub struct TemplateMailer<T> {
    sender: String,
    max_attempts: u32,
    retry_delay: Duration,
    transport: T,
}

/// Mailer that writes every message to the structured log
pub type LogMailer = TemplateMailer<LogTransport>;

impl LogMailer {
    pub fn new(config: &MailConfig) -> Self {
        TemplateMailer::with_transport(config, LogTransport)
    }
}

impl<T: Transport> TemplateMailer<T> {
    pub fn with_transport(config: &MailConfig, transport: T) -> Self {
        Self {
            sender: config.sender.clone(),
            max_attempts: config.max_attempts.max(1),
            retry_delay: config.retry_delay(),
            transport,
        }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }
}

#[async_trait]
impl<T: Transport> Mailer for TemplateMailer<T> {
    async fn send(&self, recipient: &str, template: Template, data: Value) -> Result<(), MailError> {
        let message = template.render(&self.sender, recipient, &data)?;

        let mut last_error = String::new();
        for attempt in 1..=self.max_attempts {
            match self.transport.deliver(&message).await {
                Ok(()) => {
                    info!(
                        template = %template,
                        recipient,
                        attempt,
                        "Mail delivered"
                    );
                    return Ok(());
                }
                Err(e) => {
                    warn!(template = %template, recipient, attempt, error = %e, "Mail delivery failed");
                    last_error = e.to_string();
                    if attempt < self.max_attempts {
                        tokio::time::sleep(self.retry_delay).await;
                    }
                }
            }
        }

        Err(MailError::Exhausted {
            attempts: self.max_attempts,
            last: last_error,
        })
    }
}

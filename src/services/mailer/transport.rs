//! Delivery backends

use super::{MailError, Message};
use async_trait::async_trait;
use tracing::info;

#[async_trait]
pub trait Transport: Send + Sync {
    async fn deliver(&self, message: &Message) -> Result<(), MailError>;
}

/// Emits messages to the log instead of an SMTP server
#[derive(Debug, Clone, Copy, Default)]
pub struct LogTransport;

#[async_trait]
impl Transport for LogTransport {
    async fn deliver(&self, message: &Message) -> Result<(), MailError> {
        info!(
            from = %message.from,
            to = %message.to,
            subject = %message.subject,
            body = %message.plain_body,
            "Outgoing mail"
        );
        Ok(())
    }
}

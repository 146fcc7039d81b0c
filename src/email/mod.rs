//! Outbound email delivery.
//!
//! Handlers build an [`EmailMessage`] and hand it to an [`EmailSender`]. The
//! SMTP sender is used when a relay is configured; otherwise messages go to the
//! log through [`LogEmailSender`], which is enough for local development.
//! Every send is bounded by [`send_with_timeout`] so a slow relay cannot hold
//! an HTTP request open.

mod smtp;
mod templates;

pub use smtp::{SmtpConfig, SmtpEmailSender};
pub use templates::VerificationEmailContent;

use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;
use tracing::info;

pub const DEFAULT_SEND_TIMEOUT_SECONDS: u64 = 10;

#[derive(Debug, Error)]
pub enum EmailError {
    #[error("failed to send email: {0}")]
    SendFailed(String),
    #[error("email delivery timed out after {0:?}")]
    Timeout(Duration),
    #[error("invalid email configuration: {0}")]
    InvalidConfig(String),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EmailMessage {
    pub to: String,
    pub subject: String,
    pub html: String,
    pub text: String,
}

impl EmailMessage {
    #[must_use]
    pub fn verification(to: &str, content: VerificationEmailContent) -> Self {
        Self {
            to: to.to_string(),
            subject: content.subject,
            html: content.html,
            text: content.text,
        }
    }
}

#[async_trait]
pub trait EmailSender: Send + Sync {
    /// Deliver `message` or report why it could not be handed off.
    async fn send(&self, message: &EmailMessage) -> Result<(), EmailError>;
}

/// Local dev sender that logs the message instead of delivering it.
#[derive(Clone, Debug)]
pub struct LogEmailSender;

#[async_trait]
impl EmailSender for LogEmailSender {
    async fn send(&self, message: &EmailMessage) -> Result<(), EmailError> {
        info!(
            to_email = %message.to,
            subject = %message.subject,
            body = %message.text,
            "email send stub"
        );
        Ok(())
    }
}

/// Run `sender.send` and give up after `timeout`.
///
/// # Errors
/// Returns the sender's error, or [`EmailError::Timeout`] if it did not finish in time.
pub async fn send_with_timeout(
    sender: &dyn EmailSender,
    message: &EmailMessage,
    timeout: Duration,
) -> Result<(), EmailError> {
    tokio::time::timeout(timeout, sender.send(message))
        .await
        .map_err(|_| EmailError::Timeout(timeout))?
}

// mail/mod.rs - Outbound mail collaborator
//
// Handlers build an `OutgoingMail` and hand it to whatever `Mailer` the
// application state carries. Delivery is awaited inline, so a failed send
// fails the request that triggered it.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;

use crate::config::{MailBackend, MailConfig};

pub mod console;
pub mod memory;
pub mod smtp;
pub mod templates;

pub use console::ConsoleMailer;
pub use memory::MemoryMailer;
pub use smtp::SmtpMailer;

/// A plain-text message: send(subject, body, from, to[])
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutgoingMail {
    pub subject: String,
    pub body: String,
    pub from: String,
    pub to: Vec<String>,
}

#[derive(Debug, Error)]
pub enum MailError {
    #[error("message has no recipients")]
    NoRecipients,

    #[error("invalid address '{0}'")]
    InvalidAddress(String),

    #[error("failed to build message: {0}")]
    Build(String),

    #[error("transport error: {0}")]
    Transport(String),
}

#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, mail: OutgoingMail) -> Result<(), MailError>;
}

/// Construct the mailer selected by `MAIL_BACKEND`
pub fn build_mailer(config: &MailConfig) -> Result<Arc<dyn Mailer>, MailError> {
    let mailer: Arc<dyn Mailer> = match config.backend {
        MailBackend::Smtp => Arc::new(SmtpMailer::from_config(config)?),
        MailBackend::Console => Arc::new(ConsoleMailer),
        MailBackend::Memory => Arc::new(MemoryMailer::new()),
    };
    Ok(mailer)
}

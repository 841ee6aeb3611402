use async_trait::async_trait;

use super::{MailError, Mailer, OutgoingMail};

/// Writes messages to the log instead of delivering them (development default)
pub struct ConsoleMailer;

#[async_trait]
impl Mailer for ConsoleMailer {
    async fn send(&self, mail: OutgoingMail) -> Result<(), MailError> {
        if mail.to.is_empty() {
            return Err(MailError::NoRecipients);
        }

        tracing::info!(
            from = %mail.from,
            to = ?mail.to,
            subject = %mail.subject,
            "Outgoing email\n{}",
            mail.body
        );
        Ok(())
    }
}

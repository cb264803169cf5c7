//! Error types for notification delivery

use thiserror::Error;

/// Per-attempt delivery failures. Logged, never fatal to a run.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum NotifyError {
    #[error("SMS delivery failed: {message}")]
    SmsDelivery { message: String },

    #[error("Mail delivery to {recipient} failed: {message}")]
    MailDelivery { recipient: String, message: String },
}

impl NotifyError {
    pub fn sms(message: impl Into<String>) -> Self {
        Self::SmsDelivery { message: message.into() }
    }

    pub fn mail(recipient: impl Into<String>, message: impl Into<String>) -> Self {
        Self::MailDelivery {
            recipient: recipient.into(),
            message: message.into(),
        }
    }
}

//! Alert delivery channels.
//!
//! A run hands one [`AlertMessage`] to an SMS notifier (single destination)
//! and an email notifier (once per subscriber). Notifiers never fail the
//! run: every attempt comes back as a [`NotificationResult`] that the check
//! job logs.

pub mod dry_run;
pub mod email;
pub mod error;
pub mod mock;
pub mod sms;

use std::fmt;

use async_trait::async_trait;

use crate::formatter::AlertMessage;

pub use error::NotifyError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channel {
    Sms,
    Email,
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Channel::Sms => write!(f, "sms"),
            Channel::Email => write!(f, "email"),
        }
    }
}

/// Outcome of one send attempt. Logged, never persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct NotificationResult {
    pub channel: Channel,
    pub recipient: String,
    pub success: bool,
    pub detail: String,
}

impl NotificationResult {
    pub fn from_outcome(
        channel: Channel,
        recipient: &str,
        outcome: Result<String, NotifyError>,
    ) -> Self {
        match outcome {
            Ok(detail) => Self {
                channel,
                recipient: recipient.to_string(),
                success: true,
                detail,
            },
            Err(err) => Self {
                channel,
                recipient: recipient.to_string(),
                success: false,
                detail: err.to_string(),
            },
        }
    }

    pub fn log(&self) {
        if self.success {
            tracing::info!(
                channel = %self.channel,
                recipient = %self.recipient,
                outcome = "success",
                detail = %self.detail,
                "Notification sent"
            );
        } else {
            tracing::warn!(
                channel = %self.channel,
                recipient = %self.recipient,
                outcome = "failure",
                detail = %self.detail,
                "Notification failed"
            );
        }
    }
}

#[async_trait]
pub trait SmsNotifier: Send + Sync {
    /// Send `message` to one phone number.
    async fn send(&self, message: &str, recipient: &str) -> NotificationResult;

    fn notifier_name(&self) -> &str;
}

#[async_trait]
pub trait EmailNotifier: Send + Sync {
    /// Send the rendered alert to one subscriber address.
    async fn send(&self, message: &AlertMessage, recipient: &str) -> NotificationResult;

    fn notifier_name(&self) -> &str;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ok_outcome_is_success() {
        let result =
            NotificationResult::from_outcome(Channel::Sms, "639170000000", Ok("queued".into()));
        assert!(result.success);
        assert_eq!(result.detail, "queued");
        assert_eq!(result.recipient, "639170000000");
    }

    #[test]
    fn error_outcome_keeps_error_text() {
        let result = NotificationResult::from_outcome(
            Channel::Email,
            "a@example.com",
            Err(NotifyError::mail("a@example.com", "connection refused")),
        );
        assert!(!result.success);
        assert_eq!(result.channel, Channel::Email);
        assert!(result.detail.contains("connection refused"));
    }

    #[test]
    fn channel_display_names() {
        assert_eq!(Channel::Sms.to_string(), "sms");
        assert_eq!(Channel::Email.to_string(), "email");
    }
}

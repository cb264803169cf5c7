//! Recording notifiers for exercising the check job in tests.

use std::collections::HashSet;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::alerts::{Channel, EmailNotifier, NotificationResult, NotifyError, SmsNotifier};
use crate::formatter::AlertMessage;

/// Records every SMS it is asked to send; optionally fails them all.
#[derive(Debug, Default)]
pub struct RecordingSmsNotifier {
    fail: bool,
    sent: Mutex<Vec<(String, String)>>,
}

impl RecordingSmsNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    /// `(recipient, message)` pairs, in send order.
    pub fn sent(&self) -> Vec<(String, String)> {
        self.sent.lock().map(|s| s.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl SmsNotifier for RecordingSmsNotifier {
    async fn send(&self, message: &str, recipient: &str) -> NotificationResult {
        if let Ok(mut sent) = self.sent.lock() {
            sent.push((recipient.to_string(), message.to_string()));
        }

        let outcome = if self.fail {
            Err(NotifyError::sms(r#"Unexpected gateway response: {"error":"bad key"}"#))
        } else {
            Ok("message_id 1".to_string())
        };
        NotificationResult::from_outcome(Channel::Sms, recipient, outcome)
    }

    fn notifier_name(&self) -> &str {
        "Recording"
    }
}

/// Records every email attempt; fails for the configured addresses.
#[derive(Debug, Default)]
pub struct RecordingEmailNotifier {
    failing: HashSet<String>,
    sent: Mutex<Vec<(String, String)>>,
}

impl RecordingEmailNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_for(mut self, recipient: &str) -> Self {
        self.failing.insert(recipient.to_string());
        self
    }

    /// `(recipient, subject)` pairs, in attempt order.
    pub fn attempts(&self) -> Vec<(String, String)> {
        self.sent.lock().map(|s| s.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl EmailNotifier for RecordingEmailNotifier {
    async fn send(&self, message: &AlertMessage, recipient: &str) -> NotificationResult {
        if let Ok(mut sent) = self.sent.lock() {
            sent.push((recipient.to_string(), message.subject.clone()));
        }

        let outcome = if self.failing.contains(recipient) {
            Err(NotifyError::mail(recipient, "Connection refused"))
        } else {
            Ok("SMTP 250".to_string())
        };
        NotificationResult::from_outcome(Channel::Email, recipient, outcome)
    }

    fn notifier_name(&self) -> &str {
        "Recording"
    }
}

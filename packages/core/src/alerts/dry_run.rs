//! Notifiers that only log what they would have sent.

use async_trait::async_trait;

use crate::alerts::{Channel, EmailNotifier, NotificationResult, SmsNotifier};
use crate::formatter::AlertMessage;

const DRY_RUN_DETAIL: &str = "dry run, not sent";

#[derive(Debug, Default, Clone, Copy)]
pub struct DryRunSmsNotifier;

#[async_trait]
impl SmsNotifier for DryRunSmsNotifier {
    async fn send(&self, message: &str, recipient: &str) -> NotificationResult {
        tracing::info!(recipient = %recipient, "[dry run] SMS not sent");
        tracing::debug!("{}", message);
        NotificationResult::from_outcome(Channel::Sms, recipient, Ok(DRY_RUN_DETAIL.to_string()))
    }

    fn notifier_name(&self) -> &str {
        "DryRun"
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct DryRunEmailNotifier;

#[async_trait]
impl EmailNotifier for DryRunEmailNotifier {
    async fn send(&self, message: &AlertMessage, recipient: &str) -> NotificationResult {
        tracing::info!(
            recipient = %recipient,
            subject = %message.subject,
            "[dry run] Email not sent"
        );
        NotificationResult::from_outcome(Channel::Email, recipient, Ok(DRY_RUN_DETAIL.to_string()))
    }

    fn notifier_name(&self) -> &str {
        "DryRun"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn dry_run_reports_success_without_sending() {
        let result = DryRunSmsNotifier.send("hello", "639170000000").await;
        assert!(result.success);
        assert_eq!(result.detail, DRY_RUN_DETAIL);

        let message = AlertMessage {
            subject: "1 earthquake(s) detected".to_string(),
            body: String::new(),
            events: vec![],
        };
        let result = DryRunEmailNotifier.send(&message, "a@example.com").await;
        assert!(result.success);
        assert_eq!(result.channel, Channel::Email);
    }
}

//! SMS delivery through the Semaphore gateway.
//!
//! The gateway accepts a form-encoded POST and answers with a JSON array of
//! queued messages. Only a first element carrying a `message_id` counts as
//! delivered; anything else is logged with the raw response.

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;

use crate::alerts::{Channel, NotificationResult, NotifyError, SmsNotifier};
use crate::config::SmsConfig;

pub const DEFAULT_SMS_GATEWAY_URL: &str = "https://api.semaphore.co/api/v4/messages";

#[derive(Clone)]
pub struct SemaphoreSmsNotifier {
    config: SmsConfig,
    http: Client,
}

#[derive(Debug, Serialize)]
struct SmsForm<'a> {
    apikey: &'a str,
    number: &'a str,
    message: &'a str,
    sendername: &'a str,
}

impl SemaphoreSmsNotifier {
    pub fn new(config: SmsConfig) -> Self {
        Self {
            config,
            http: Client::new(),
        }
    }

    async fn deliver(&self, message: &str, recipient: &str) -> Result<String, NotifyError> {
        let form = SmsForm {
            apikey: &self.config.api_key,
            number: recipient,
            message,
            sendername: &self.config.sender_name,
        };

        let response = self
            .http
            .post(&self.config.gateway_url)
            .form(&form)
            .send()
            .await
            .map_err(|e| NotifyError::sms(format!("Failed to reach SMS gateway: {}", e)))?;

        let status = response.status();
        let raw = response
            .text()
            .await
            .map_err(|e| NotifyError::sms(format!("Failed to read gateway response: {}", e)))?;

        interpret_response(&raw).map_err(|err| {
            tracing::warn!(status = %status, response = %raw, "SMS gateway did not queue the message");
            err
        })
    }
}

/// Decide delivery from the gateway's raw response body.
///
/// Success is exactly a JSON array whose first element has a non-null
/// `message_id`; the returned detail names that id.
pub fn interpret_response(raw: &str) -> Result<String, NotifyError> {
    let value: serde_json::Value = serde_json::from_str(raw)
        .map_err(|e| NotifyError::sms(format!("Malformed gateway response ({}): {}", e, raw)))?;

    match value
        .as_array()
        .and_then(|messages| messages.first())
        .and_then(|first| first.get("message_id"))
    {
        Some(id) if !id.is_null() => Ok(format!("message_id {}", id)),
        _ => Err(NotifyError::sms(format!("Unexpected gateway response: {}", raw))),
    }
}

#[async_trait]
impl SmsNotifier for SemaphoreSmsNotifier {
    async fn send(&self, message: &str, recipient: &str) -> NotificationResult {
        let outcome = self.deliver(message, recipient).await;
        NotificationResult::from_outcome(Channel::Sms, recipient, outcome)
    }

    fn notifier_name(&self) -> &str {
        "Semaphore"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::{
        matchers::{body_string_contains, method, path},
        Mock, MockServer, ResponseTemplate,
    };

    fn config_for(gateway_url: String) -> SmsConfig {
        SmsConfig {
            api_key: "test-key".to_string(),
            sender_name: "QUAKEALERT".to_string(),
            gateway_url,
            recipient: "639170000000".to_string(),
        }
    }

    #[test]
    fn list_with_message_id_is_success() {
        let detail = interpret_response(r#"[{"message_id":123}]"#).unwrap();
        assert_eq!(detail, "message_id 123");
    }

    #[test]
    fn empty_list_is_failure() {
        assert!(matches!(
            interpret_response("[]"),
            Err(NotifyError::SmsDelivery { .. })
        ));
    }

    #[test]
    fn error_object_is_failure() {
        let err = interpret_response(r#"{"error":"bad key"}"#).unwrap_err();
        assert!(err.to_string().contains("bad key"));
    }

    #[test]
    fn malformed_json_is_failure() {
        assert!(interpret_response("Internal Server Error").is_err());
    }

    #[test]
    fn first_element_without_message_id_is_failure() {
        assert!(interpret_response(r#"[{"status":"Failed"},{"message_id":1}]"#).is_err());
    }

    #[test]
    fn null_message_id_is_failure() {
        assert!(interpret_response(r#"[{"message_id":null}]"#).is_err());
    }

    #[tokio::test]
    async fn posts_form_fields_and_reports_success() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/v4/messages"))
            .and(body_string_contains("apikey=test-key"))
            .and(body_string_contains("number=639170000000"))
            .and(body_string_contains("sendername=QUAKEALERT"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string(r#"[{"message_id":46811653,"status":"Queued"}]"#),
            )
            .expect(1)
            .mount(&server)
            .await;

        let notifier =
            SemaphoreSmsNotifier::new(config_for(format!("{}/api/v4/messages", server.uri())));
        let result = notifier.send("1 earthquake(s) detected!\n", "639170000000").await;

        assert!(result.success, "{}", result.detail);
        assert_eq!(result.channel, Channel::Sms);
        assert_eq!(result.detail, "message_id 46811653");
    }

    #[tokio::test]
    async fn gateway_error_body_is_failure() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(401).set_body_string(r#"{"error":"bad key"}"#))
            .mount(&server)
            .await;

        let notifier = SemaphoreSmsNotifier::new(config_for(server.uri()));
        let result = notifier.send("hello", "639170000000").await;

        assert!(!result.success);
        assert!(result.detail.contains("bad key"));
    }

    #[tokio::test]
    async fn unreachable_gateway_is_failure_not_panic() {
        let server = MockServer::start().await;
        let url = server.uri();
        drop(server);

        let notifier = SemaphoreSmsNotifier::new(config_for(url));
        let result = notifier.send("hello", "639170000000").await;

        assert!(!result.success);
        assert!(result.detail.contains("Failed to reach SMS gateway"));
    }
}

//! Email alerts over SMTP.
//!
//! The alert body is rendered from a plain-text Handlebars template and sent
//! with lettre's blocking SMTP transport on the blocking thread pool.

use async_trait::async_trait;
use handlebars::Handlebars;
use lettre::{
    message::{header::ContentType, Mailbox},
    transport::smtp::authentication::Credentials,
    Message, SmtpTransport, Transport,
};
use serde::Serialize;

use crate::alerts::{Channel, EmailNotifier, NotificationResult, NotifyError};
use crate::config::MailConfig;
use crate::error::AppError;
use crate::formatter::AlertMessage;

pub const SUBJECT_PREFIX: &str = "[ALERT] ";

const ALERT_TEMPLATE_NAME: &str = "earthquake_alert";

const ALERT_TEMPLATE: &str = "{{subject}}

{{body}}

Details
{{#each events}}
- {{title}}
  Magnitude: {{magnitude}}
  Location: {{location}}
  Event ID: {{id}}
{{/each}}
";

/// Implicit-TLS SMTP port; every other port negotiates STARTTLS.
const SMTPS_PORT: u16 = 465;

#[derive(Serialize)]
struct AlertView<'a> {
    subject: &'a str,
    body: &'a str,
    events: Vec<EventView<'a>>,
}

#[derive(Serialize)]
struct EventView<'a> {
    id: &'a str,
    title: &'a str,
    magnitude: String,
    location: String,
}

/// Plain-text renderer for alert emails.
pub struct AlertTemplate {
    registry: Handlebars<'static>,
}

impl AlertTemplate {
    pub fn new() -> Result<Self, AppError> {
        let mut registry = Handlebars::new();
        registry.set_strict_mode(true);
        registry.register_escape_fn(handlebars::no_escape);
        registry
            .register_template_string(ALERT_TEMPLATE_NAME, ALERT_TEMPLATE)
            .map_err(|e| AppError::Config(format!("Invalid alert template: {}", e)))?;

        Ok(Self { registry })
    }

    pub fn render(&self, message: &AlertMessage) -> Result<String, String> {
        let view = AlertView {
            subject: &message.subject,
            body: &message.body,
            events: message
                .events
                .iter()
                .map(|event| EventView {
                    id: &event.id,
                    title: &event.title,
                    magnitude: event
                        .magnitude
                        .map(|m| format!("{:.1}", m))
                        .unwrap_or_else(|| "n/a".to_string()),
                    location: event
                        .coordinates
                        .map(|c| format!("{:.3}, {:.3}", c.latitude, c.longitude))
                        .unwrap_or_else(|| "unknown".to_string()),
                })
                .collect(),
        };

        self.registry
            .render(ALERT_TEMPLATE_NAME, &view)
            .map_err(|e| format!("Failed to render alert: {}", e))
    }
}

pub struct SmtpEmailNotifier {
    from: Mailbox,
    transport: SmtpTransport,
    template: AlertTemplate,
}

impl SmtpEmailNotifier {
    /// Builds the transport without connecting; connection errors surface per send.
    pub fn new(config: &MailConfig) -> Result<Self, AppError> {
        let from: Mailbox = config
            .from
            .parse()
            .map_err(|e| AppError::Config(format!("Invalid MAIL_FROM '{}': {}", config.from, e)))?;

        let credentials = Credentials::new(config.username.clone(), config.password.clone());
        let relay = if config.smtp_port == SMTPS_PORT {
            SmtpTransport::relay(&config.smtp_host)
        } else {
            SmtpTransport::starttls_relay(&config.smtp_host)
        };
        let builder = relay.map_err(|e| AppError::Config(format!("SMTP relay configuration error: {}", e)))?;

        let transport = builder
            .port(config.smtp_port)
            .credentials(credentials)
            .build();

        Ok(Self {
            from,
            transport,
            template: AlertTemplate::new()?,
        })
    }

    fn build_email(&self, message: &AlertMessage, recipient: &str) -> Result<Message, NotifyError> {
        let to: Mailbox = recipient
            .parse()
            .map_err(|e| NotifyError::mail(recipient, format!("Invalid email address: {}", e)))?;

        let body = self
            .template
            .render(message)
            .map_err(|e| NotifyError::mail(recipient, e))?;

        Message::builder()
            .from(self.from.clone())
            .to(to)
            .subject(format!("{}{}", SUBJECT_PREFIX, message.subject))
            .header(ContentType::TEXT_PLAIN)
            .body(body)
            .map_err(|e| NotifyError::mail(recipient, format!("Failed to build email: {}", e)))
    }

    async fn deliver(&self, message: &AlertMessage, recipient: &str) -> Result<String, NotifyError> {
        let email = self.build_email(message, recipient)?;

        let result = tokio::task::spawn_blocking({
            let transport = self.transport.clone();
            move || transport.send(&email)
        })
        .await
        .map_err(|e| NotifyError::mail(recipient, format!("Mail task failed: {}", e)))?;

        let response = result.map_err(|e| NotifyError::mail(recipient, e.to_string()))?;
        Ok(format!("SMTP {}", response.code()))
    }
}

#[async_trait]
impl EmailNotifier for SmtpEmailNotifier {
    async fn send(&self, message: &AlertMessage, recipient: &str) -> NotificationResult {
        let outcome = self.deliver(message, recipient).await;
        NotificationResult::from_outcome(Channel::Email, recipient, outcome)
    }

    fn notifier_name(&self) -> &str {
        "SMTP"
    }
}

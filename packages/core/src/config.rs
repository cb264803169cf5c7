use std::env;
use std::str::FromStr;

use chrono::FixedOffset;

use crate::alerts::sms::DEFAULT_SMS_GATEWAY_URL;
use crate::feed::DEFAULT_RESULT_LIMIT;
use crate::services::usgs::DEFAULT_USGS_FEED_URL;

const DEFAULT_SMTP_PORT: u16 = 587;
const DEFAULT_DISPLAY_UTC_OFFSET_HOURS: i32 = 8;

#[derive(Debug, Clone)]
pub struct Config {
    pub feed: FeedConfig,
    pub sms: SmsConfig,
    pub mail: MailConfig,
    /// Timezone used when showing event times.
    pub display_offset: FixedOffset,
}

#[derive(Debug, Clone)]
pub struct FeedConfig {
    pub url: String,
    pub result_limit: u32,
}

#[derive(Debug, Clone)]
pub struct SmsConfig {
    pub api_key: String,
    pub sender_name: String,
    pub gateway_url: String,
    /// Single destination number for every alert.
    pub recipient: String,
}

#[derive(Debug, Clone)]
pub struct MailConfig {
    pub smtp_host: String,
    pub smtp_port: u16,
    pub username: String,
    pub password: String,
    pub from: String,
    pub subscribers: Vec<String>,
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, String>
    where
        F: Fn(&str) -> Option<String>,
    {
        let feed = FeedConfig {
            url: optional(&lookup, "USGS_FEED_URL")
                .unwrap_or_else(|| DEFAULT_USGS_FEED_URL.to_string()),
            result_limit: parsed_or(&lookup, "FEED_RESULT_LIMIT", DEFAULT_RESULT_LIMIT)?,
        };
        if feed.result_limit == 0 {
            return Err("FEED_RESULT_LIMIT must be greater than zero".to_string());
        }

        let sms = SmsConfig {
            api_key: required(&lookup, "SEMAPHORE_API_KEY")?,
            sender_name: required(&lookup, "SEMAPHORE_SENDER_NAME")?,
            gateway_url: optional(&lookup, "SMS_GATEWAY_URL")
                .unwrap_or_else(|| DEFAULT_SMS_GATEWAY_URL.to_string()),
            recipient: required(&lookup, "SMS_RECIPIENT")?,
        };

        let mail = MailConfig {
            smtp_host: required(&lookup, "SMTP_HOST")?,
            smtp_port: parsed_or(&lookup, "SMTP_PORT", DEFAULT_SMTP_PORT)?,
            username: required(&lookup, "SMTP_USERNAME")?,
            password: required(&lookup, "SMTP_PASSWORD")?,
            from: required(&lookup, "MAIL_FROM")?,
            subscribers: parse_subscribers(&required(&lookup, "SUBSCRIBERS")?),
        };

        let offset_hours: i32 = parsed_or(
            &lookup,
            "DISPLAY_UTC_OFFSET_HOURS",
            DEFAULT_DISPLAY_UTC_OFFSET_HOURS,
        )?;
        let display_offset = offset_hours
            .checked_mul(3600)
            .and_then(FixedOffset::east_opt)
            .ok_or_else(|| format!("DISPLAY_UTC_OFFSET_HOURS out of range: {}", offset_hours))?;

        Ok(Self {
            feed,
            sms,
            mail,
            display_offset,
        })
    }
}

/// Split a comma separated address list, dropping blanks.
pub fn parse_subscribers(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

fn optional<F>(lookup: &F, key: &str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key).filter(|v| !v.trim().is_empty())
}

fn required<F>(lookup: &F, key: &str) -> Result<String, String>
where
    F: Fn(&str) -> Option<String>,
{
    optional(lookup, key).ok_or_else(|| format!("{} is required", key))
}

fn parsed_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T, String>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match optional(lookup, key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|_| format!("{} must be a valid number", key)),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn base_vars() -> HashMap<&'static str, String> {
        [
            ("SEMAPHORE_API_KEY", "key"),
            ("SEMAPHORE_SENDER_NAME", "QUAKEALERT"),
            ("SMS_RECIPIENT", "639170000000"),
            ("SMTP_HOST", "smtp.example.com"),
            ("SMTP_USERNAME", "user"),
            ("SMTP_PASSWORD", "secret"),
            ("MAIL_FROM", "alerts@example.com"),
            ("SUBSCRIBERS", "a@example.com, b@example.com"),
        ]
        .into_iter()
        .map(|(k, v)| (k, v.to_string()))
        .collect()
    }

    fn load(vars: &HashMap<&'static str, String>) -> Result<Config, String> {
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_apply_when_optional_keys_missing() {
        let config = load(&base_vars()).unwrap();

        assert_eq!(config.feed.url, DEFAULT_USGS_FEED_URL);
        assert_eq!(config.feed.result_limit, 10);
        assert_eq!(config.sms.gateway_url, DEFAULT_SMS_GATEWAY_URL);
        assert_eq!(config.mail.smtp_port, 587);
        assert_eq!(config.display_offset.local_minus_utc(), 8 * 3600);
        assert_eq!(
            config.mail.subscribers,
            vec!["a@example.com".to_string(), "b@example.com".to_string()]
        );
    }

    #[test]
    fn missing_required_key_is_named() {
        let mut vars = base_vars();
        vars.remove("SEMAPHORE_API_KEY");
        assert_eq!(load(&vars).unwrap_err(), "SEMAPHORE_API_KEY is required");
    }

    #[test]
    fn blank_required_key_counts_as_missing() {
        let mut vars = base_vars();
        vars.insert("SMS_RECIPIENT", "  ".to_string());
        assert!(load(&vars).unwrap_err().contains("SMS_RECIPIENT"));
    }

    #[test]
    fn invalid_port_is_rejected() {
        let mut vars = base_vars();
        vars.insert("SMTP_PORT", "smtp".to_string());
        assert_eq!(load(&vars).unwrap_err(), "SMTP_PORT must be a valid number");
    }

    #[test]
    fn out_of_range_offset_is_rejected() {
        let mut vars = base_vars();
        vars.insert("DISPLAY_UTC_OFFSET_HOURS", "30".to_string());
        assert!(load(&vars).unwrap_err().contains("out of range"));
    }

    #[test]
    fn negative_offset_is_accepted() {
        let mut vars = base_vars();
        vars.insert("DISPLAY_UTC_OFFSET_HOURS", "-5".to_string());
        assert_eq!(load(&vars).unwrap().display_offset.local_minus_utc(), -5 * 3600);
    }

    #[test]
    fn zero_result_limit_is_rejected() {
        let mut vars = base_vars();
        vars.insert("FEED_RESULT_LIMIT", "0".to_string());
        assert!(load(&vars).is_err());
    }

    #[test]
    fn subscriber_list_drops_blanks() {
        assert_eq!(
            parse_subscribers(" a@example.com,,b@example.com , "),
            vec!["a@example.com".to_string(), "b@example.com".to_string()]
        );
        assert!(parse_subscribers("").is_empty());
    }
}

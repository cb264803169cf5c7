//! Alert formatting.
//!
//! Turns a fetched batch into the single [`AlertMessage`] a run sends out.
//! Event times are shown in the deployment's display timezone, modelled as
//! a fixed UTC offset.

use chrono::{DateTime, FixedOffset, Offset, Utc};

use crate::feed::{EarthquakeBatch, EarthquakeEvent};

/// Display format for event times, e.g. `2017-04-24 00:05:05 +08:00`.
pub const DISPLAY_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S %:z";

/// The one alert built per run with a non-empty batch.
#[derive(Debug, Clone, PartialEq)]
pub struct AlertMessage {
    pub subject: String,
    /// One `"{display time}: {title}"` line per event.
    pub body: String,
    pub events: EarthquakeBatch,
}

impl AlertMessage {
    /// Compact text for the SMS gateway: headline plus one title per line.
    pub fn sms_text(&self) -> String {
        let mut text = format!("{}!\n", self.subject);
        for event in &self.events {
            text.push(' ');
            text.push_str(&event.title);
            text.push('\n');
        }
        text
    }
}

#[derive(Debug, Clone, Copy)]
pub struct EventFormatter {
    display_offset: FixedOffset,
}

impl EventFormatter {
    pub fn new(display_offset: FixedOffset) -> Self {
        Self { display_offset }
    }

    pub fn display_time(&self, at: DateTime<Utc>) -> String {
        at.with_timezone(&self.display_offset)
            .format(DISPLAY_TIME_FORMAT)
            .to_string()
    }

    pub fn event_line(&self, event: &EarthquakeEvent) -> String {
        format!("{}: {}", self.display_time(event.occurred_at), event.title)
    }

    pub fn summarize(&self, batch: EarthquakeBatch) -> AlertMessage {
        let subject = format!("{} earthquake(s) detected", batch.len());
        let body = batch
            .iter()
            .map(|event| self.event_line(event))
            .collect::<Vec<_>>()
            .join("\n");

        AlertMessage {
            subject,
            body,
            events: batch,
        }
    }
}

impl Default for EventFormatter {
    fn default() -> Self {
        Self::new(Utc.fix())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn burgos() -> EarthquakeEvent {
        EarthquakeEvent {
            id: "us10008kgh".to_string(),
            magnitude: Some(5.3),
            title: "M 5.3 - 12km E of Burgos".to_string(),
            occurred_at: Utc.timestamp_millis_opt(1492963505000).unwrap(),
            coordinates: None,
        }
    }

    fn manila() -> EventFormatter {
        EventFormatter::new(FixedOffset::east_opt(8 * 3600).unwrap())
    }

    #[test]
    fn single_event_summary() {
        let message = manila().summarize(vec![burgos()]);

        assert_eq!(message.subject, "1 earthquake(s) detected");
        assert_eq!(
            message.body,
            "2017-04-24 00:05:05 +08:00: M 5.3 - 12km E of Burgos"
        );
        assert_eq!(message.events.len(), 1);
    }

    #[test]
    fn body_has_one_line_per_event_in_order() {
        let mut second = burgos();
        second.title = "M 4.5 - 157km SE of Pondaguitan".to_string();

        let message = manila().summarize(vec![burgos(), second]);
        let lines: Vec<&str> = message.body.lines().collect();

        assert_eq!(message.subject, "2 earthquake(s) detected");
        assert_eq!(lines.len(), 2);
        assert!(lines[0].ends_with("Burgos"));
        assert!(lines[1].ends_with("Pondaguitan"));
    }

    #[test]
    fn utc_formatter_keeps_feed_time() {
        let line = EventFormatter::default().event_line(&burgos());
        assert_eq!(line, "2017-04-23 16:05:05 +00:00: M 5.3 - 12km E of Burgos");
    }

    #[test]
    fn sms_text_lists_titles() {
        let message = manila().summarize(vec![burgos()]);
        assert_eq!(
            message.sms_text(),
            "1 earthquake(s) detected!\n M 5.3 - 12km E of Burgos\n"
        );
    }

    #[test]
    fn summarize_is_deterministic() {
        let a = manila().summarize(vec![burgos()]);
        let b = manila().summarize(vec![burgos()]);
        assert_eq!(a, b);
    }
}

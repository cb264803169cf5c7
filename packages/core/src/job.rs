//! Earthquake check job.
//!
//! One invocation is one run: `Init → Fetch → (NoOp | Notify) → Done`.
//! A feed failure ends the run in error; notifier failures are logged and
//! the run still completes. Nothing is carried between runs, so events seen
//! by an earlier run are alerted again if they fall inside a later window.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::alerts::dry_run::{DryRunEmailNotifier, DryRunSmsNotifier};
use crate::alerts::email::SmtpEmailNotifier;
use crate::alerts::sms::SemaphoreSmsNotifier;
use crate::alerts::{EmailNotifier, NotificationResult, SmsNotifier};
use crate::config::Config;
use crate::error::AppError;
use crate::feed::{EarthquakeBatch, EarthquakeFeed, FeedError, LookbackWindow, QueryParameters};
use crate::formatter::EventFormatter;
use crate::services::usgs::UsgsFeedClient;

/// Recipients and query limits for a run.
#[derive(Debug, Clone)]
pub struct JobSettings {
    pub sms_recipient: String,
    pub subscribers: Vec<String>,
    pub result_limit: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// The window held no events; nothing was sent.
    NoEvents,
    /// Alerts were attempted on every channel.
    Notified,
}

/// Summary of a completed run.
#[derive(Debug, Clone)]
pub struct RunReport {
    pub outcome: RunOutcome,
    pub events_found: usize,
    pub notifications: Vec<NotificationResult>,
}

impl RunReport {
    pub fn failed_notifications(&self) -> usize {
        self.notifications.iter().filter(|n| !n.success).count()
    }
}

enum JobState {
    Init,
    Fetch(QueryParameters),
    NoOp,
    Notify(EarthquakeBatch),
    Done(RunReport),
}

pub struct CheckJob {
    feed: Arc<dyn EarthquakeFeed + Send + Sync>,
    sms: Arc<dyn SmsNotifier>,
    email: Arc<dyn EmailNotifier>,
    formatter: EventFormatter,
    settings: JobSettings,
}

impl CheckJob {
    pub fn new(
        feed: Arc<dyn EarthquakeFeed + Send + Sync>,
        sms: Arc<dyn SmsNotifier>,
        email: Arc<dyn EmailNotifier>,
        formatter: EventFormatter,
        settings: JobSettings,
    ) -> Self {
        Self {
            feed,
            sms,
            email,
            formatter,
            settings,
        }
    }

    /// Wire the production feed and notifiers, or logging-only notifiers
    /// when `dry_run` is set.
    pub fn from_config(config: &Config, dry_run: bool) -> Result<Self, AppError> {
        let feed = Arc::new(UsgsFeedClient::new(config.feed.url.clone()));

        let (sms, email): (Arc<dyn SmsNotifier>, Arc<dyn EmailNotifier>) = if dry_run {
            (Arc::new(DryRunSmsNotifier), Arc::new(DryRunEmailNotifier))
        } else {
            (
                Arc::new(SemaphoreSmsNotifier::new(config.sms.clone())),
                Arc::new(SmtpEmailNotifier::new(&config.mail)?),
            )
        };

        let settings = JobSettings {
            sms_recipient: config.sms.recipient.clone(),
            subscribers: config.mail.subscribers.clone(),
            result_limit: config.feed.result_limit,
        };

        Ok(Self::new(
            feed,
            sms,
            email,
            EventFormatter::new(config.display_offset),
            settings,
        ))
    }

    /// Execute one run with the evaluation clock fixed at `now`.
    pub async fn run(&self, window: LookbackWindow, now: DateTime<Utc>) -> Result<RunReport, FeedError> {
        let mut state = JobState::Init;

        loop {
            state = match state {
                JobState::Init => {
                    tracing::info!("=============================================");
                    tracing::info!(started_at = %now, "Starting earthquake check");
                    tracing::info!(
                        minutes = window.minutes(),
                        "Checking for earthquakes in the last {} minute(s)",
                        window.minutes()
                    );
                    JobState::Fetch(QueryParameters::for_window(
                        window,
                        now,
                        self.settings.result_limit,
                    ))
                }

                JobState::Fetch(params) => {
                    tracing::info!(
                        feed = self.feed.feed_name(),
                        start_time = %params.start_time(),
                        limit = params.result_limit(),
                        "Fetching earthquake data"
                    );

                    match self.feed.fetch(&params).await {
                        Ok(batch) if batch.is_empty() => JobState::NoOp,
                        Ok(batch) => JobState::Notify(batch),
                        Err(err) => {
                            tracing::error!(feed = self.feed.feed_name(), "Earthquake check failed: {}", err);
                            return Err(err);
                        }
                    }
                }

                JobState::NoOp => {
                    tracing::info!(outcome = "success", "No earthquakes detected");
                    JobState::Done(RunReport {
                        outcome: RunOutcome::NoEvents,
                        events_found: 0,
                        notifications: Vec::new(),
                    })
                }

                JobState::Notify(batch) => JobState::Done(self.notify(batch).await),

                JobState::Done(report) => {
                    tracing::info!(
                        events = report.events_found,
                        notifications = report.notifications.len(),
                        failed = report.failed_notifications(),
                        finished_at = %Utc::now(),
                        "Earthquake check finished"
                    );
                    tracing::info!("=============================================");
                    return Ok(report);
                }
            };
        }
    }

    async fn notify(&self, batch: EarthquakeBatch) -> RunReport {
        let events_found = batch.len();
        tracing::warn!(count = events_found, "{} earthquake(s) found!", events_found);
        for event in &batch {
            tracing::warn!("{}", self.formatter.event_line(event));
        }

        let message = self.formatter.summarize(batch);
        let sms_text = message.sms_text();

        tracing::info!(
            subscribers = self.settings.subscribers.len(),
            "Sending notifications to subscribers"
        );
        tracing::debug!("Sending the following content:\n{}", sms_text);

        let mut notifications = Vec::with_capacity(1 + self.settings.subscribers.len());

        let result = self.sms.send(&sms_text, &self.settings.sms_recipient).await;
        result.log();
        notifications.push(result);

        if self.settings.subscribers.is_empty() {
            tracing::warn!("No email subscribers configured");
        }
        for subscriber in &self.settings.subscribers {
            let result = self.email.send(&message, subscriber).await;
            result.log();
            notifications.push(result);
        }

        RunReport {
            outcome: RunOutcome::Notified,
            events_found,
            notifications,
        }
    }
}

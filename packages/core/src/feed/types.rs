//! Core data types for the earthquake feed

use chrono::{DateTime, Duration, SubsecRound, Utc};
use serde::{Deserialize, Serialize};

/// Lookback used when the command line does not give one.
pub const DEFAULT_LOOKBACK_MINUTES: u32 = 30;

/// Result cap requested from the feed unless configured otherwise.
pub const DEFAULT_RESULT_LIMIT: u32 = 10;

pub const MIN_MAGNITUDE: f64 = 0.0;
pub const MAX_MAGNITUDE: f64 = 10.0;

/// Wire format of the `starttime` query parameter.
pub const START_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Trailing span of minutes whose events count as new for a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LookbackWindow {
    minutes: u32,
}

impl LookbackWindow {
    /// Returns `None` for a zero-minute window.
    pub fn new(minutes: u32) -> Option<Self> {
        (minutes > 0).then_some(Self { minutes })
    }

    pub fn minutes(&self) -> u32 {
        self.minutes
    }

    /// `now` minus the window, truncated to whole seconds.
    pub fn start_from(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        (now - Duration::minutes(i64::from(self.minutes))).trunc_subsecs(0)
    }
}

impl Default for LookbackWindow {
    fn default() -> Self {
        Self {
            minutes: DEFAULT_LOOKBACK_MINUTES,
        }
    }
}

/// Parameters of one feed query. Built once per run and never mutated.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryParameters {
    min_magnitude: f64,
    max_magnitude: f64,
    start_time: DateTime<Utc>,
    result_limit: u32,
}

impl QueryParameters {
    /// Full magnitude range, starting `window` before `now`.
    pub fn for_window(window: LookbackWindow, now: DateTime<Utc>, result_limit: u32) -> Self {
        Self {
            min_magnitude: MIN_MAGNITUDE,
            max_magnitude: MAX_MAGNITUDE,
            start_time: window.start_from(now),
            result_limit,
        }
    }

    pub fn min_magnitude(&self) -> f64 {
        self.min_magnitude
    }

    pub fn max_magnitude(&self) -> f64 {
        self.max_magnitude
    }

    pub fn start_time(&self) -> DateTime<Utc> {
        self.start_time
    }

    pub fn result_limit(&self) -> u32 {
        self.result_limit
    }

    /// Query string pairs as the feed expects them.
    pub fn to_query_pairs(&self) -> Vec<(&'static str, String)> {
        vec![
            ("minmagnitude", self.min_magnitude.to_string()),
            ("maxmagnitude", self.max_magnitude.to_string()),
            ("starttime", self.start_time.format(START_TIME_FORMAT).to_string()),
            ("limit", self.result_limit.to_string()),
        ]
    }
}

/// Latitude / longitude pair in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

/// A single event as reported by the feed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EarthquakeEvent {
    pub id: String,
    /// The feed reports `null` for events not yet measured.
    pub magnitude: Option<f64>,
    pub title: String,
    pub occurred_at: DateTime<Utc>,
    pub coordinates: Option<Coordinates>,
}

/// Events returned by one fetch, in feed order.
pub type EarthquakeBatch = Vec<EarthquakeEvent>;

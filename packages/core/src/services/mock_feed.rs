//! Scripted feed for driving the check job without a network.

use std::sync::Mutex;

use async_trait::async_trait;

use crate::feed::{EarthquakeBatch, EarthquakeFeed, FeedError, FeedResult, QueryParameters};

/// Returns a fixed batch (or error) and records every query it receives.
#[derive(Debug, Default)]
pub struct MockFeedClient {
    events: EarthquakeBatch,
    error: Option<FeedError>,
    queries: Mutex<Vec<QueryParameters>>,
}

impl MockFeedClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_events(mut self, events: EarthquakeBatch) -> Self {
        self.events = events;
        self
    }

    pub fn with_error(mut self, error: FeedError) -> Self {
        self.error = Some(error);
        self
    }

    /// Every query seen so far, oldest first.
    pub fn queries(&self) -> Vec<QueryParameters> {
        self.queries.lock().map(|q| q.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl EarthquakeFeed for MockFeedClient {
    async fn fetch(&self, params: &QueryParameters) -> FeedResult<EarthquakeBatch> {
        if let Ok(mut queries) = self.queries.lock() {
            queries.push(params.clone());
        }

        match &self.error {
            Some(err) => Err(err.clone()),
            None => Ok(self.events.clone()),
        }
    }

    fn feed_name(&self) -> &str {
        "Mock"
    }
}

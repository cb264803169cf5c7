//! Earthquake Feed Interface
//!
//! Abstraction over the upstream data source so the check job can be driven
//! by the USGS client in production and by scripted feeds in tests.

use async_trait::async_trait;

use crate::feed::{
    error::FeedError,
    types::{EarthquakeBatch, QueryParameters},
};

/// Result type for feed operations
pub type FeedResult<T> = Result<T, FeedError>;

#[async_trait]
pub trait EarthquakeFeed {
    /// Fetch every event matching `params`. An empty batch is not an error.
    async fn fetch(&self, params: &QueryParameters) -> FeedResult<EarthquakeBatch>;

    /// Name of this feed for logging
    fn feed_name(&self) -> &str;
}

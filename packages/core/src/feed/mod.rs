//! Earthquake feed module
//!
//! Query parameters, event types and the fetch seam shared by the real
//! USGS client and the in-memory feeds used in tests.

pub mod error;
pub mod provider;
pub mod types;

pub use error::FeedError;
pub use provider::{EarthquakeFeed, FeedResult};
pub use types::*;

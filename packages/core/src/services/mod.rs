pub mod mock_feed;
pub mod usgs;

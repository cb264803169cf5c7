//! USGS earthquake feed client.
//!
//! Queries the FDSN event service for GeoJSON and maps each feature onto an
//! [`EarthquakeEvent`]. There is no retry: any failure is handed back to the
//! check job, which treats it as fatal for the run.

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use reqwest::Client;
use serde::Deserialize;

use crate::feed::{
    Coordinates, EarthquakeBatch, EarthquakeEvent, EarthquakeFeed, FeedError, FeedResult,
    QueryParameters,
};

/// Public FDSN event endpoint.
pub const DEFAULT_USGS_FEED_URL: &str = "https://earthquake.usgs.gov/fdsnws/event/1/query";

#[derive(Clone)]
pub struct UsgsFeedClient {
    base_url: String,
    http: Client,
}

impl UsgsFeedClient {
    pub fn new(base_url: String) -> Self {
        Self {
            base_url,
            http: Client::new(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[derive(Debug, Deserialize)]
struct FeatureCollection {
    features: Vec<Feature>,
}

#[derive(Debug, Deserialize)]
struct Feature {
    #[serde(default)]
    id: String,
    properties: FeatureProperties,
    geometry: Option<Geometry>,
}

#[derive(Debug, Deserialize)]
struct FeatureProperties {
    title: String,
    /// Epoch milliseconds.
    time: i64,
    mag: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct Geometry {
    /// `[longitude, latitude, depth]`
    coordinates: Vec<f64>,
}

impl Feature {
    fn into_event(self) -> FeedResult<EarthquakeEvent> {
        let occurred_at = Utc
            .timestamp_millis_opt(self.properties.time)
            .single()
            .ok_or_else(|| {
                FeedError::parse(format!(
                    "Invalid event time '{}' for '{}'",
                    self.properties.time, self.properties.title
                ))
            })?;

        let coordinates = self.geometry.and_then(|g| match g.coordinates.as_slice() {
            [longitude, latitude, ..] => Some(Coordinates {
                latitude: *latitude,
                longitude: *longitude,
            }),
            _ => None,
        });

        Ok(EarthquakeEvent {
            id: self.id,
            magnitude: self.properties.mag,
            title: self.properties.title,
            occurred_at,
            coordinates,
        })
    }
}

/// Decode a GeoJSON feature collection into a batch, keeping feed order.
pub fn parse_feature_collection(body: &str) -> FeedResult<EarthquakeBatch> {
    let collection: FeatureCollection = serde_json::from_str(body)
        .map_err(|e| FeedError::parse(format!("Failed to parse feed response: {}", e)))?;

    collection
        .features
        .into_iter()
        .map(Feature::into_event)
        .collect()
}

#[async_trait]
impl EarthquakeFeed for UsgsFeedClient {
    async fn fetch(&self, params: &QueryParameters) -> FeedResult<EarthquakeBatch> {
        let response = self
            .http
            .get(&self.base_url)
            .query(&[("format", "geojson")])
            .query(&params.to_query_pairs())
            .send()
            .await
            .map_err(|e| FeedError::unavailable(format!("Failed to reach feed: {}", e)))?;

        if !response.status().is_success() {
            return Err(FeedError::unavailable(format!(
                "Feed returned HTTP {}",
                response.status()
            )));
        }

        let body = response
            .text()
            .await
            .map_err(|e| FeedError::unavailable(format!("Failed to read feed response: {}", e)))?;

        parse_feature_collection(&body)
    }

    fn feed_name(&self) -> &str {
        "USGS"
    }
}

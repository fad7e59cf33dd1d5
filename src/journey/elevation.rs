//! Elevation profile lookups.
//!
//! # Responsibilities
//! - Query the elevation service for the height profile of a section shape
//! - Reduce the profile to the points where the height changes
//!
//! # Design Decisions
//! - Blocking client: it is only used from worker threads, which already
//!   block on the routing engine
//! - Callers treat every error as "no elevation"; a request never fails
//!   because of this service

use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;
use url::Url;

use crate::config::ElevationConfig;
use crate::engine::Coordinate;
use crate::proto::ElevationInfo;

#[derive(Debug, Error)]
pub enum ElevationError {
    #[error("invalid elevation service url: {0}")]
    Url(#[from] url::ParseError),

    #[error("elevation request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("elevation service answered {0}")]
    Status(u16),

    #[error("invalid elevation response: {0}")]
    Json(#[from] serde_json::Error),
}

/// Source of elevation samples along a shape.
pub trait ElevationProvider {
    fn elevations(&self, shape: &[Coordinate]) -> Result<Vec<ElevationInfo>, ElevationError>;
}

#[derive(Debug, Deserialize)]
struct HeightResponse {
    /// `[distance from start, height]` per shape point.
    range_height: Vec<[f64; 2]>,
}

/// Keep the first sample and every sample whose height differs from the
/// previous one.
pub fn parse_range_height(body: &str) -> Result<Vec<ElevationInfo>, ElevationError> {
    let response: HeightResponse = serde_json::from_str(body)?;
    let mut elevations: Vec<ElevationInfo> = Vec::new();

    for (idx, [distance, height]) in response.range_height.into_iter().enumerate() {
        if elevations.last().is_some_and(|previous| previous.elevation == height) {
            continue;
        }
        elevations.push(ElevationInfo {
            distance_from_start: distance,
            elevation: height,
            geojson_index: idx as u32,
        });
    }

    Ok(elevations)
}

fn round6(value: f64) -> f64 {
    (value * 1e6).round() / 1e6
}

/// HTTP client for a Valhalla-style `/height` endpoint.
#[derive(Debug)]
pub struct ElevationClient {
    endpoint: Url,
    client: reqwest::blocking::Client,
}

impl ElevationClient {
    /// `None` when no service is configured.
    ///
    /// Must be called outside of an async runtime.
    pub fn from_config(config: &ElevationConfig) -> Result<Option<Self>, ElevationError> {
        let Some(base) = &config.service_url else {
            return Ok(None);
        };
        let mut endpoint = Url::parse(base)?;
        endpoint
            .path_segments_mut()
            .map_err(|()| url::ParseError::RelativeUrlWithCannotBeABaseBase)?
            .pop_if_empty()
            .push("height");
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()?;
        Ok(Some(Self { endpoint, client }))
    }
}

impl ElevationProvider for ElevationClient {
    fn elevations(&self, shape: &[Coordinate]) -> Result<Vec<ElevationInfo>, ElevationError> {
        let points: Vec<serde_json::Value> = shape
            .iter()
            .map(|c| serde_json::json!({ "lat": round6(c.lat), "lon": round6(c.lon) }))
            .collect();
        let query = serde_json::json!({ "range": true, "shape": points }).to_string();

        let response = self
            .client
            .get(self.endpoint.clone())
            .query(&[("json", query)])
            .send()?;
        if !response.status().is_success() {
            return Err(ElevationError::Status(response.status().as_u16()));
        }
        parse_range_height(&response.text()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_only_height_changes() {
        let body = r#"{"shape":[],"range_height":[[0,12],[10,12],[25,14],[40,14],[52,12]]}"#;
        let elevations = parse_range_height(body).unwrap();
        let summary: Vec<(f64, f64, u32)> = elevations
            .iter()
            .map(|e| (e.distance_from_start, e.elevation, e.geojson_index))
            .collect();
        assert_eq!(summary, vec![(0.0, 12.0, 0), (25.0, 14.0, 2), (52.0, 12.0, 4)]);
    }

    #[test]
    fn malformed_body_is_an_error() {
        assert!(matches!(parse_range_height("{}"), Err(ElevationError::Json(_))));
        assert!(matches!(parse_range_height("<html>"), Err(ElevationError::Json(_))));
    }

    #[test]
    fn unconfigured_service_builds_no_client() {
        let client = ElevationClient::from_config(&ElevationConfig::default()).unwrap();
        assert!(client.is_none());
    }

    #[test]
    fn endpoint_is_joined_to_the_base_url() {
        let config = ElevationConfig {
            service_url: Some("http://localhost:8002/".into()),
            timeout_ms: 100,
        };
        let client = ElevationClient::from_config(&config).unwrap().unwrap();
        assert_eq!(client.endpoint.as_str(), "http://localhost:8002/height");
    }

    #[test]
    fn endpoint_keeps_the_base_path() {
        for base in ["http://valhalla.internal:8002/valhalla", "http://valhalla.internal:8002/valhalla/"] {
            let config = ElevationConfig {
                service_url: Some(base.into()),
                timeout_ms: 100,
            };
            let client = ElevationClient::from_config(&config).unwrap().unwrap();
            assert_eq!(client.endpoint.as_str(), "http://valhalla.internal:8002/valhalla/height");
        }

        let config = ElevationConfig {
            service_url: Some("http://localhost:8002".into()),
            timeout_ms: 100,
        };
        let client = ElevationClient::from_config(&config).unwrap().unwrap();
        assert_eq!(client.endpoint.as_str(), "http://localhost:8002/height");
    }

    #[test]
    fn opaque_base_url_is_rejected() {
        let config = ElevationConfig {
            service_url: Some("mailto:elevation@example.com".into()),
            timeout_ms: 100,
        };
        assert!(matches!(ElevationClient::from_config(&config), Err(ElevationError::Url(_))));
    }
}

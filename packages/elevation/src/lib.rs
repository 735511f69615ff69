#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Batched elevation lookup against an Open-Elevation-compatible service.
//!
//! Coordinates are submitted in fixed-size batches (the provider caps
//! request size), each batch retried a bounded number of times with
//! exponential backoff and a per-request timeout. A batch that exhausts
//! its retries falls back to elevation 0.0 for its coordinates rather
//! than failing the pipeline, and an overall deadline bounds the whole
//! enrichment step the same way. Batches are independent network calls
//! and run concurrently under a bounded pool; results are written back
//! into position-stable slots so output ordering never depends on
//! completion order.

use std::time::Duration;

use futures::stream::{self, StreamExt as _};
use geo::Point;
use serde_json::json;
use thiserror::Error;

/// Default maximum number of coordinates per batch request (provider
/// limit).
pub const DEFAULT_BATCH_SIZE: usize = 50;

/// Errors from a single elevation batch request.
#[derive(Debug, Error)]
pub enum ElevationError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Response parsing failed.
    #[error("Parse error: {message}")]
    Parse {
        /// Description of the parsing failure.
        message: String,
    },
}

/// Elevation client configuration. All values are documented defaults and
/// overridable per request.
#[derive(Debug, Clone)]
pub struct ElevationConfig {
    /// Batch lookup endpoint.
    pub base_url: String,
    /// Coordinates per batch request.
    pub batch_size: usize,
    /// Attempts per batch before falling back to 0.0.
    pub max_attempts: u32,
    /// Per-request timeout.
    pub request_timeout: Duration,
    /// Deadline for the whole enrichment step; exceeded means zero
    /// fallback for every coordinate rather than a failed request.
    pub overall_deadline: Duration,
    /// Bounded concurrency across batches.
    pub concurrent_batches: usize,
}

impl Default for ElevationConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.open-elevation.com/api/v1/lookup".to_string(),
            batch_size: DEFAULT_BATCH_SIZE,
            max_attempts: 3,
            request_timeout: Duration::from_secs(30),
            overall_deadline: Duration::from_secs(120),
            concurrent_batches: 4,
        }
    }
}

/// Batched elevation client.
pub struct ElevationClient {
    client: reqwest::Client,
    config: ElevationConfig,
}

impl ElevationClient {
    /// Creates a client with the given configuration.
    #[must_use]
    pub fn new(config: ElevationConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }

    /// Creates a client with the documented default configuration.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self::new(ElevationConfig::default())
    }

    /// Fetches elevations for geographic coordinates (lon/lat).
    ///
    /// Never fails: coordinates whose batch exhausts its retries, and the
    /// entire set when the overall deadline elapses, come back as 0.0.
    /// The returned vector is position-aligned with the input.
    pub async fn elevations(&self, coords: &[Point<f64>]) -> Vec<f64> {
        if coords.is_empty() {
            return Vec::new();
        }

        let batch_size = self.config.batch_size.max(1);
        let fetches = stream::iter(coords.chunks(batch_size).enumerate().map(
            |(index, chunk)| async move { (index, self.fetch_batch_with_retry(chunk).await) },
        ))
        .buffer_unordered(self.config.concurrent_batches.max(1))
        .collect::<Vec<_>>();

        match tokio::time::timeout(self.config.overall_deadline, fetches).await {
            Ok(results) => assemble(results, coords.len(), batch_size),
            Err(_) => {
                log::warn!(
                    "elevation enrichment exceeded the {:?} deadline; \
                     falling back to 0.0 for {} coordinates",
                    self.config.overall_deadline,
                    coords.len()
                );
                vec![0.0; coords.len()]
            }
        }
    }

    /// Fetches one batch, retrying with exponential backoff. Exhausted
    /// retries degrade to 0.0 for every coordinate in the batch.
    async fn fetch_batch_with_retry(&self, chunk: &[Point<f64>]) -> Vec<f64> {
        for attempt in 0..self.config.max_attempts {
            if attempt > 0 {
                let delay = Duration::from_secs(1u64 << attempt);
                log::warn!("  elevation retry {attempt}/{} in {delay:?}...", self.config.max_attempts - 1);
                tokio::time::sleep(delay).await;
            }

            match self.fetch_batch(chunk).await {
                Ok(values) => return values,
                Err(e) => {
                    log::warn!("elevation batch of {} failed (attempt {}): {e}", chunk.len(), attempt + 1);
                }
            }
        }

        log::warn!(
            "elevation batch exhausted {} attempts; assigning 0.0 to {} coordinates",
            self.config.max_attempts,
            chunk.len()
        );
        vec![0.0; chunk.len()]
    }

    async fn fetch_batch(&self, chunk: &[Point<f64>]) -> Result<Vec<f64>, ElevationError> {
        let response = self
            .client
            .post(&self.config.base_url)
            .json(&lookup_request(chunk))
            .timeout(self.config.request_timeout)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ElevationError::Parse {
                message: format!("HTTP {status}"),
            });
        }

        let body: serde_json::Value = response.json().await?;
        parse_lookup_response(&body, chunk.len())
    }
}

/// Builds the batch lookup request body.
fn lookup_request(chunk: &[Point<f64>]) -> serde_json::Value {
    let locations: Vec<serde_json::Value> = chunk
        .iter()
        .map(|p| json!({ "latitude": p.y(), "longitude": p.x() }))
        .collect();
    json!({ "locations": locations })
}

/// Parses the batch lookup response.
///
/// The provider echoes one result per requested location, in request
/// order.
fn parse_lookup_response(
    body: &serde_json::Value,
    expected: usize,
) -> Result<Vec<f64>, ElevationError> {
    let results = body["results"].as_array().ok_or_else(|| ElevationError::Parse {
        message: "Missing results array".to_string(),
    })?;

    if results.len() != expected {
        return Err(ElevationError::Parse {
            message: format!("Expected {expected} results, got {}", results.len()),
        });
    }

    results
        .iter()
        .map(|r| {
            r["elevation"].as_f64().ok_or_else(|| ElevationError::Parse {
                message: "Missing elevation value".to_string(),
            })
        })
        .collect()
}

/// Writes per-batch results back into position-stable slots. Slots whose
/// batch is missing (deadline races) stay at the 0.0 fallback.
fn assemble(results: Vec<(usize, Vec<f64>)>, total: usize, batch_size: usize) -> Vec<f64> {
    let mut out = vec![0.0; total];
    for (index, values) in results {
        let start = index * batch_size;
        for (offset, value) in values.into_iter().enumerate() {
            if let Some(slot) = out.get_mut(start + offset) {
                *slot = value;
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_body_shape() {
        let body = lookup_request(&[Point::new(77.209, 28.6139)]);
        let loc = &body["locations"][0];
        assert!((loc["latitude"].as_f64().unwrap() - 28.6139).abs() < 1e-9);
        assert!((loc["longitude"].as_f64().unwrap() - 77.209).abs() < 1e-9);
    }

    #[test]
    fn parses_lookup_response() {
        let body = json!({
            "results": [
                { "latitude": 28.6, "longitude": 77.2, "elevation": 216.0 },
                { "latitude": 28.7, "longitude": 77.3, "elevation": 221.5 },
            ]
        });
        let values = parse_lookup_response(&body, 2).unwrap();
        assert_eq!(values, vec![216.0, 221.5]);
    }

    #[test]
    fn rejects_length_mismatch() {
        let body = json!({ "results": [{ "elevation": 10.0 }] });
        assert!(parse_lookup_response(&body, 2).is_err());
    }

    #[test]
    fn rejects_missing_elevation() {
        let body = json!({ "results": [{ "latitude": 28.6 }] });
        assert!(parse_lookup_response(&body, 1).is_err());
    }

    #[test]
    fn assemble_is_position_stable_regardless_of_completion_order() {
        // Batches completed out of order.
        let results = vec![(1, vec![3.0, 4.0]), (0, vec![1.0, 2.0]), (2, vec![5.0])];
        assert_eq!(assemble(results, 5, 2), vec![1.0, 2.0, 3.0, 4.0, 5.0]);
    }

    #[test]
    fn assemble_leaves_missing_batches_at_zero() {
        let results = vec![(0, vec![1.0, 2.0])];
        assert_eq!(assemble(results, 4, 2), vec![1.0, 2.0, 0.0, 0.0]);
    }
}

//! HTTP client for a Google-Places-style API.
//!
//! Transient failures (connect errors, timeouts, 5xx) are retried with
//! exponential backoff plus a little jitter so concurrent retries do
//! not land in lockstep. Everything else fails fast.

use std::time::Duration;

use rand::Rng;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use paws_shared::errors::{AppError, AppResult, ErrorCode};

/// Tunable parameters for the backoff strategy.
pub struct RetryConfig {
    pub initial_delay: Duration,
    pub max_delay: Duration,
    pub multiplier: f64,
    pub max_attempts: u32,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            initial_delay: Duration::from_millis(200),
            max_delay: Duration::from_secs(2),
            multiplier: 2.0,
            max_attempts: 3,
        }
    }
}

/// Next backoff delay, clamped to the configured maximum.
pub fn next_delay(current: Duration, config: &RetryConfig) -> Duration {
    let next_ms = (current.as_millis() as f64 * config.multiplier) as u64;
    Duration::from_millis(next_ms).min(config.max_delay)
}

// --- Wire types ---

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Geometry {
    pub location: LatLng,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawPlace {
    pub place_id: String,
    pub name: String,
    #[serde(default)]
    pub types: Vec<String>,
    pub vicinity: Option<String>,
    pub rating: Option<f64>,
    pub geometry: Geometry,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawPlaceDetails {
    pub place_id: String,
    pub name: String,
    #[serde(default)]
    pub types: Vec<String>,
    pub formatted_address: Option<String>,
    pub formatted_phone_number: Option<String>,
    pub website: Option<String>,
    pub rating: Option<f64>,
    pub geometry: Geometry,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Prediction {
    pub place_id: String,
    pub description: String,
}

#[derive(Debug, Deserialize)]
struct NearbySearchResponse {
    status: String,
    #[serde(default)]
    results: Vec<RawPlace>,
}

#[derive(Debug, Deserialize)]
struct PlaceDetailsResponse {
    status: String,
    result: Option<RawPlaceDetails>,
}

#[derive(Debug, Deserialize)]
struct AutocompleteResponse {
    status: String,
    #[serde(default)]
    predictions: Vec<Prediction>,
}

// --- Client ---

pub struct PlacesClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    retry: RetryConfig,
}

impl PlacesClient {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .user_agent(concat!("paws-location/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            base_url: base_url.into(),
            api_key: api_key.into(),
            retry: RetryConfig::default(),
        })
    }

    pub async fn nearby_search(
        &self,
        lat: f64,
        lng: f64,
        radius_m: u32,
        keyword: Option<&str>,
    ) -> AppResult<Vec<RawPlace>> {
        let url = format!("{}/nearbysearch/json", self.base_url);
        let mut query = vec![
            ("location", format!("{lat},{lng}")),
            ("radius", radius_m.to_string()),
            ("key", self.api_key.clone()),
        ];
        if let Some(keyword) = keyword {
            query.push(("keyword", keyword.to_string()));
        }

        let resp: NearbySearchResponse = self.get_with_retry(&url, &query).await?;
        check_status(&resp.status)?;
        Ok(resp.results)
    }

    pub async fn place_details(&self, place_id: &str) -> AppResult<RawPlaceDetails> {
        let url = format!("{}/details/json", self.base_url);
        let query = vec![
            ("place_id", place_id.to_string()),
            ("key", self.api_key.clone()),
        ];

        let resp: PlaceDetailsResponse = self.get_with_retry(&url, &query).await?;
        if resp.status == "NOT_FOUND" || resp.status == "INVALID_REQUEST" {
            return Err(AppError::new(ErrorCode::PlaceNotFound, "place not found"));
        }
        check_status(&resp.status)?;
        resp.result
            .ok_or_else(|| AppError::new(ErrorCode::PlaceNotFound, "place not found"))
    }

    pub async fn autocomplete(&self, input: &str) -> AppResult<Vec<Prediction>> {
        let url = format!("{}/autocomplete/json", self.base_url);
        let query = vec![
            ("input", input.to_string()),
            ("key", self.api_key.clone()),
        ];

        let resp: AutocompleteResponse = self.get_with_retry(&url, &query).await?;
        check_status(&resp.status)?;
        Ok(resp.predictions)
    }

    async fn get_with_retry<T: DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, String)],
    ) -> AppResult<T> {
        let mut delay = self.retry.initial_delay;
        let mut attempt = 0u32;

        loop {
            attempt += 1;

            match self.http.get(url).query(query).send().await {
                Ok(resp) if resp.status().is_server_error() => {
                    tracing::warn!(status = %resp.status(), attempt, "places API server error");
                }
                Ok(resp) => {
                    let resp = resp.error_for_status().map_err(|e| {
                        tracing::error!(error = %e, "places API rejected the request");
                        AppError::new(ErrorCode::PlacesUnavailable, "places API error")
                    })?;
                    return resp.json::<T>().await.map_err(|e| {
                        tracing::error!(error = %e, "places API returned malformed JSON");
                        AppError::new(ErrorCode::PlacesUnavailable, "places API error")
                    });
                }
                Err(e) if e.is_connect() || e.is_timeout() => {
                    tracing::warn!(error = %e, attempt, "places API unreachable");
                }
                Err(e) => {
                    tracing::error!(error = %e, "places API request failed");
                    return Err(AppError::new(ErrorCode::PlacesUnavailable, "places API error"));
                }
            }

            if attempt >= self.retry.max_attempts {
                return Err(AppError::new(
                    ErrorCode::PlacesUnavailable,
                    "places API unavailable after retries",
                ));
            }

            let jitter = Duration::from_millis(rand::thread_rng().gen_range(0..=50));
            tokio::time::sleep(delay + jitter).await;
            delay = next_delay(delay, &self.retry);
        }
    }
}

fn check_status(status: &str) -> AppResult<()> {
    match status {
        "OK" | "ZERO_RESULTS" => Ok(()),
        "OVER_QUERY_LIMIT" => Err(AppError::new(
            ErrorCode::PlacesRateLimited,
            "places API quota exceeded",
        )),
        other => {
            tracing::error!(status = %other, "places API returned a failure status");
            Err(AppError::new(ErrorCode::PlacesUnavailable, "places API error"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn next_delay_doubles() {
        let config = RetryConfig::default();
        assert_eq!(
            next_delay(Duration::from_millis(200), &config),
            Duration::from_millis(400)
        );
        assert_eq!(
            next_delay(Duration::from_millis(400), &config),
            Duration::from_millis(800)
        );
    }

    #[test]
    fn next_delay_clamps_at_max() {
        let config = RetryConfig::default();
        assert_eq!(
            next_delay(Duration::from_millis(1500), &config),
            Duration::from_secs(2)
        );
        assert_eq!(next_delay(Duration::from_secs(2), &config), Duration::from_secs(2));
    }

    #[test]
    fn ok_and_zero_results_pass_through() {
        assert!(check_status("OK").is_ok());
        assert!(check_status("ZERO_RESULTS").is_ok());
        assert!(check_status("REQUEST_DENIED").is_err());
        assert!(check_status("OVER_QUERY_LIMIT").is_err());
    }
}

//! Place lookup backend implementation.
//!
//! Provides the `PlaceLookup` trait and its Google Places
//! implementation. The trait keeps the matching core provider-agnostic;
//! only this crate knows about endpoints and payload shapes.

use napaudit_model::LookupResult;
use std::future::Future;
use thiserror::Error;

/// Errors from place lookup operations.
#[derive(Debug, Error)]
pub enum BackendError {
    #[error("Connection failed: {0}")]
    Connection(String),

    #[error("Lookup rejected: {0}")]
    Rejected(String),

    #[error("Parse error: {0}")]
    Parse(String),
}

/// Trait for place lookup providers.
///
/// `Ok(None)` is the zero-results case: the lookup ran and found
/// nothing, which is an ordinary outcome and distinct from an error.
pub trait PlaceLookup {
    /// Resolve the best-matching place for a free-text query.
    fn lookup(
        &self,
        query: &str,
    ) -> impl Future<Output = Result<Option<LookupResult>, BackendError>> + Send;

    /// Get the backend name for logging.
    fn name(&self) -> &'static str;
}

/// Google Places backend configuration.
#[derive(Debug, Clone)]
pub struct PlacesConfig {
    /// Base URL for the Places web service
    pub base_url: String,
    /// API key sent with every request
    pub api_key: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for PlacesConfig {
    fn default() -> Self {
        Self {
            base_url: "https://maps.googleapis.com/maps/api/place".to_string(),
            api_key: String::new(),
            timeout_secs: 30,
        }
    }
}

/// The fields pulled from the top text-search hit before the detail
/// fetch.
#[derive(Debug, Clone)]
struct TopHit {
    name: String,
    place_id: String,
}

/// Google Places backend.
///
/// Lookup is a two-step flow: a Text Search resolves the top hit's name
/// and place id, then a Place Details request resolves the formatted
/// phone number and address for that place.
pub struct PlacesBackend {
    config: PlacesConfig,
    client: reqwest::Client,
}

impl PlacesBackend {
    /// Create a new Places backend.
    pub fn new(config: PlacesConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .expect("Failed to create HTTP client");

        Self { config, client }
    }

    async fn get_json(
        &self,
        url: String,
        params: &[(&str, &str)],
    ) -> Result<serde_json::Value, BackendError> {
        let response = self
            .client
            .get(url)
            .query(params)
            .send()
            .await
            .map_err(|e| BackendError::Connection(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(BackendError::Rejected(format!("HTTP {}: {}", status, body)));
        }

        response
            .json()
            .await
            .map_err(|e| BackendError::Parse(e.to_string()))
    }

    /// Parse a Text Search response into the top hit, if any.
    fn parse_search_response(
        &self,
        response: &serde_json::Value,
    ) -> Result<Option<TopHit>, BackendError> {
        match service_status(response)? {
            ServiceStatus::ZeroResults => return Ok(None),
            ServiceStatus::Ok => {}
        }

        let results = response
            .get("results")
            .and_then(|r| r.as_array())
            .ok_or_else(|| BackendError::Parse("Missing results array".to_string()))?;

        let Some(top) = results.first() else {
            return Ok(None);
        };

        let name = top
            .get("name")
            .and_then(|v| v.as_str())
            .unwrap_or("")
            .to_string();

        let place_id = top
            .get("place_id")
            .and_then(|v| v.as_str())
            .ok_or_else(|| BackendError::Parse("Top result has no place_id".to_string()))?
            .to_string();

        Ok(Some(TopHit { name, place_id }))
    }

    /// Parse a Place Details response into (phone, address).
    fn parse_details_response(
        &self,
        response: &serde_json::Value,
    ) -> Result<(String, String), BackendError> {
        match service_status(response)? {
            // A details fetch for a known place id should never be
            // empty; treat it like missing fields.
            ServiceStatus::ZeroResults => return Ok((String::new(), String::new())),
            ServiceStatus::Ok => {}
        }

        let result = response
            .get("result")
            .ok_or_else(|| BackendError::Parse("Missing result object".to_string()))?;

        let phone = result
            .get("formatted_phone_number")
            .and_then(|v| v.as_str())
            .unwrap_or("")
            .to_string();

        let address = result
            .get("formatted_address")
            .and_then(|v| v.as_str())
            .unwrap_or("")
            .to_string();

        Ok((phone, address))
    }
}

enum ServiceStatus {
    Ok,
    ZeroResults,
}

/// Check the service-level status string the Places payloads carry.
/// Anything other than OK / ZERO_RESULTS is a rejection, with the
/// provider's error message attached when present.
fn service_status(response: &serde_json::Value) -> Result<ServiceStatus, BackendError> {
    let status = response
        .get("status")
        .and_then(|v| v.as_str())
        .ok_or_else(|| BackendError::Parse("Missing status field".to_string()))?;

    match status {
        "OK" => Ok(ServiceStatus::Ok),
        "ZERO_RESULTS" => Ok(ServiceStatus::ZeroResults),
        other => {
            let message = response
                .get("error_message")
                .and_then(|v| v.as_str())
                .unwrap_or("");
            if message.is_empty() {
                Err(BackendError::Rejected(other.to_string()))
            } else {
                Err(BackendError::Rejected(format!("{}: {}", other, message)))
            }
        }
    }
}

impl PlaceLookup for PlacesBackend {
    async fn lookup(&self, query: &str) -> Result<Option<LookupResult>, BackendError> {
        tracing::debug!(query = %query, "Executing Places text search");

        let search = self
            .get_json(
                format!("{}/textsearch/json", self.config.base_url),
                &[("query", query), ("key", self.config.api_key.as_str())],
            )
            .await?;

        let Some(hit) = self.parse_search_response(&search)? else {
            return Ok(None);
        };

        tracing::debug!(place_id = %hit.place_id, "Fetching place details");

        let details = self
            .get_json(
                format!("{}/details/json", self.config.base_url),
                &[
                    ("place_id", hit.place_id.as_str()),
                    ("fields", "formatted_phone_number,formatted_address"),
                    ("key", self.config.api_key.as_str()),
                ],
            )
            .await?;

        let (phone, address) = self.parse_details_response(&details)?;

        Ok(Some(LookupResult::new(hit.name, phone, address)))
    }

    fn name(&self) -> &'static str {
        "google-places"
    }
}

//! HTTP client for the Mapbox forward-geocoding endpoint.
//!
//! Every request is restricted to US street addresses (`country=us`,
//! `types=address`) and asks for a single candidate.

use std::time::Duration;

use reqwest::{Client, Url};

use crate::error::GeocodeError;
use crate::types::{ErrorBody, FeatureCollection, GeocodeCandidate};

const DEFAULT_BASE_URL: &str = "https://api.mapbox.com/";

/// Client for the Mapbox Geocoding v5 API.
///
/// Use [`MapboxClient::new`] for production or [`MapboxClient::with_base_url`]
/// to point at a mock server in tests.
pub struct MapboxClient {
    client: Client,
    access_token: String,
    base_url: Url,
}

impl MapboxClient {
    /// Creates a new client pointed at the production Mapbox API.
    ///
    /// # Errors
    ///
    /// Returns [`GeocodeError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(access_token: &str, timeout_secs: u64) -> Result<Self, GeocodeError> {
        Self::with_base_url(access_token, timeout_secs, DEFAULT_BASE_URL)
    }

    /// Creates a new client with a custom base URL.
    ///
    /// # Errors
    ///
    /// Returns [`GeocodeError::Http`] if the `reqwest::Client` cannot be
    /// built, or [`GeocodeError::InvalidBaseUrl`] if `base_url` does not parse
    /// or cannot carry path segments.
    pub fn with_base_url(
        access_token: &str,
        timeout_secs: u64,
        base_url: &str,
    ) -> Result<Self, GeocodeError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent("tradearea/0.1 (geocoding)")
            .build()?;

        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let parsed = Url::parse(&normalised)
            .map_err(|_| GeocodeError::InvalidBaseUrl(base_url.to_owned()))?;
        if parsed.cannot_be_a_base() {
            return Err(GeocodeError::InvalidBaseUrl(base_url.to_owned()));
        }

        Ok(Self {
            client,
            access_token: access_token.to_owned(),
            base_url: parsed,
        })
    }

    /// Resolves `address` to its best US street-address match.
    ///
    /// Returns `Ok(None)` when Mapbox finds no candidate.
    ///
    /// # Errors
    ///
    /// - [`GeocodeError::UnexpectedStatus`] on a non-2xx response.
    /// - [`GeocodeError::Http`] on network failure.
    /// - [`GeocodeError::Deserialize`] if the body is not a feature collection.
    pub async fn geocode(&self, address: &str) -> Result<Option<GeocodeCandidate>, GeocodeError> {
        let url = self.build_url(address);
        let response = self.client.get(url).send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let message = serde_json::from_str::<ErrorBody>(&body)
                .ok()
                .and_then(|b| b.message)
                .unwrap_or_else(|| "no error message".to_string());
            tracing::warn!(status = status.as_u16(), %message, "geocoding request rejected");
            return Err(GeocodeError::UnexpectedStatus {
                status: status.as_u16(),
                message,
            });
        }

        let collection: FeatureCollection =
            serde_json::from_str(&body).map_err(|e| GeocodeError::Deserialize {
                context: "geocoding feature collection".to_string(),
                source: e,
            })?;

        let candidate = collection
            .features
            .into_iter()
            .next()
            .map(GeocodeCandidate::from);
        tracing::debug!(found = candidate.is_some(), "geocoding complete");
        Ok(candidate)
    }

    /// Builds `{base}/geocoding/v5/mapbox.places/{address}.json?...`.
    ///
    /// The address is pushed as a single path segment so spaces, slashes and
    /// `#` are percent-encoded rather than splitting the path.
    fn build_url(&self, address: &str) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments
                .pop_if_empty()
                .extend(["geocoding", "v5", "mapbox.places"])
                .push(&format!("{address}.json"));
        }
        url.query_pairs_mut()
            .append_pair("access_token", &self.access_token)
            .append_pair("country", "us")
            .append_pair("types", "address")
            .append_pair("limit", "1");
        url
    }
}

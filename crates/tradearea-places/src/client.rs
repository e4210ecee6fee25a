//! HTTP client for the Google Places `nearbysearch` endpoint.

use std::time::Duration;

use reqwest::{Client, Url};
use tradearea_core::{miles_to_meters, Coordinates};

use crate::error::PlacesError;
use crate::population::PopulationEstimate;
use crate::types::NearbySearch;

const DEFAULT_BASE_URL: &str = "https://maps.googleapis.com/";

/// Client for Google Places nearby search.
///
/// Makes a single request per call and does not follow `next_page_token`,
/// so at most one page of results (20 places) is counted.
pub struct PlacesClient {
    client: Client,
    api_key: String,
    base_url: Url,
}

impl PlacesClient {
    /// # Errors
    ///
    /// Returns [`PlacesError::Http`] if the `reqwest::Client` cannot be built.
    pub fn new(api_key: &str, timeout_secs: u64) -> Result<Self, PlacesError> {
        Self::with_base_url(api_key, timeout_secs, DEFAULT_BASE_URL)
    }

    /// Creates a client against a custom base URL (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`PlacesError::Http`] if the `reqwest::Client` cannot be built,
    /// or [`PlacesError::InvalidBaseUrl`] if `base_url` does not parse.
    pub fn with_base_url(
        api_key: &str,
        timeout_secs: u64,
        base_url: &str,
    ) -> Result<Self, PlacesError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent("tradearea/0.1 (population-estimate)")
            .build()?;

        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base_url =
            Url::parse(&normalised).map_err(|_| PlacesError::InvalidBaseUrl(base_url.to_owned()))?;

        Ok(Self {
            client,
            api_key: api_key.to_owned(),
            base_url,
        })
    }

    /// Lists establishments within `radius_meters` of `center`.
    ///
    /// # Errors
    ///
    /// - [`PlacesError::UnexpectedStatus`] on a non-2xx response.
    /// - [`PlacesError::Api`] when the body carries an `error_message`.
    /// - [`PlacesError::Http`] on network failure.
    /// - [`PlacesError::Deserialize`] if the body is not valid JSON.
    pub async fn nearby_establishments(
        &self,
        center: Coordinates,
        radius_meters: f64,
    ) -> Result<NearbySearch, PlacesError> {
        let url = self.nearby_search_url(center, radius_meters)?;
        tracing::info!(%center, radius_meters, "fetching from Places API");

        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            tracing::error!(status = status.as_u16(), "Places API response not OK");
            return Err(PlacesError::UnexpectedStatus {
                status: status.as_u16(),
            });
        }

        let body = response.text().await?;
        let search: NearbySearch =
            serde_json::from_str(&body).map_err(|e| PlacesError::Deserialize {
                context: "nearby search response".to_string(),
                source: e,
            })?;

        if let Some(message) = search.error_message.as_deref().filter(|m| !m.is_empty()) {
            tracing::error!(status = %search.status, %message, "Places API error");
            return Err(PlacesError::Api(message.to_owned()));
        }

        tracing::info!(place_count = search.results.len(), "found places in the area");
        Ok(search)
    }

    /// Counts establishments within `radius_miles` of `center` and converts
    /// the count to a population figure.
    ///
    /// # Errors
    ///
    /// Propagates every error from [`PlacesClient::nearby_establishments`].
    pub async fn estimate_population(
        &self,
        center: Coordinates,
        radius_miles: f64,
    ) -> Result<PopulationEstimate, PlacesError> {
        let search = self
            .nearby_establishments(center, miles_to_meters(radius_miles))
            .await?;
        let place_count = u64::try_from(search.results.len()).unwrap_or(u64::MAX);
        Ok(PopulationEstimate::from_place_count(place_count))
    }

    fn nearby_search_url(
        &self,
        center: Coordinates,
        radius_meters: f64,
    ) -> Result<Url, PlacesError> {
        let mut url = self
            .base_url
            .join("maps/api/place/nearbysearch/json")
            .map_err(|_| PlacesError::InvalidBaseUrl(self.base_url.to_string()))?;
        url.query_pairs_mut()
            .append_pair(
                "location",
                &format!("{},{}", center.latitude, center.longitude),
            )
            .append_pair("radius", &radius_meters.to_string())
            .append_pair("type", "establishment")
            .append_pair("key", &self.api_key);
        Ok(url)
    }
}

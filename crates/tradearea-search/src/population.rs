//! Client for the population endpoint served by `tradearea-server`.

use std::time::Duration;

use reqwest::{Client, Url};
use serde::{Deserialize, Serialize};
use tradearea_core::Coordinates;
use tradearea_places::PopulationEstimate;

use crate::error::PopulationClientError;

#[derive(Debug, Serialize)]
struct PopulationRequest {
    lng: f64,
    lat: f64,
    radius: f64,
}

#[derive(Debug, Default, Deserialize)]
struct ErrorPayload {
    #[serde(default)]
    error: String,
    #[serde(default)]
    details: Option<String>,
}

pub struct PopulationClient {
    client: Client,
    url: Url,
}

impl PopulationClient {
    /// # Errors
    ///
    /// Returns [`PopulationClientError::InvalidUrl`] if `url` does not parse,
    /// or [`PopulationClientError::Http`] if the client cannot be built.
    pub fn new(url: &str, timeout_secs: u64) -> Result<Self, PopulationClientError> {
        let parsed = Url::parse(url).map_err(|_| PopulationClientError::InvalidUrl(url.to_owned()))?;
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .build()?;
        Ok(Self { client, url: parsed })
    }

    /// Asks the endpoint for a population estimate around `center`.
    ///
    /// # Errors
    ///
    /// Returns [`PopulationClientError::Endpoint`] when the endpoint answers
    /// with a non-2xx status, or [`PopulationClientError::Http`] on network
    /// or decode failure.
    pub async fn estimate(
        &self,
        center: Coordinates,
        radius_miles: f64,
    ) -> Result<PopulationEstimate, PopulationClientError> {
        let body = PopulationRequest {
            lng: center.longitude,
            lat: center.latitude,
            radius: radius_miles,
        };
        let response = self.client.post(self.url.clone()).json(&body).send().await?;
        let status = response.status();

        if !status.is_success() {
            let payload: ErrorPayload = response.json().await.unwrap_or_default();
            let message = match payload.details {
                Some(details) if !payload.error.is_empty() => {
                    format!("{}: {details}", payload.error)
                }
                Some(details) => details,
                None => payload.error,
            };
            tracing::warn!(status = status.as_u16(), %message, "population endpoint error");
            return Err(PopulationClientError::Endpoint {
                status: status.as_u16(),
                message,
            });
        }

        let estimate: PopulationEstimate = response.json().await?;
        tracing::debug!(
            population = estimate.population,
            place_count = estimate.place_count,
            "population estimate received"
        );
        Ok(estimate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn posts_lng_lat_radius_and_returns_estimate() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/population"))
            .and(body_json(serde_json::json!({
                "lng": -118.24,
                "lat": 34.05,
                "radius": 5.0
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "population": 20000,
                "placeCount": 20
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client =
            PopulationClient::new(&format!("{}/api/population", server.uri()), 5).unwrap();
        let estimate = client
            .estimate(Coordinates::new(-118.24, 34.05), 5.0)
            .await
            .unwrap();
        assert_eq!(estimate.population, 20_000);
        assert_eq!(estimate.place_count, 20);
    }

    #[tokio::test]
    async fn error_payload_becomes_endpoint_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500).set_body_json(serde_json::json!({
                "error": "Google Maps API key is not configured",
                "details": "Environment variable GOOGLE_MAPS_API_KEY is not set"
            })))
            .mount(&server)
            .await;

        let client = PopulationClient::new(&server.uri(), 5).unwrap();
        let err = client
            .estimate(Coordinates::new(-118.24, 34.05), 5.0)
            .await
            .unwrap_err();
        match err {
            PopulationClientError::Endpoint { status, message } => {
                assert_eq!(status, 500);
                assert!(message.starts_with("Google Maps API key is not configured"));
                assert!(message.contains("GOOGLE_MAPS_API_KEY"));
            }
            other => panic!("expected Endpoint, got {other:?}"),
        }
    }

    #[test]
    fn rejects_unparseable_url() {
        assert!(matches!(
            PopulationClient::new("not a url", 5),
            Err(PopulationClientError::InvalidUrl(_))
        ));
    }
}

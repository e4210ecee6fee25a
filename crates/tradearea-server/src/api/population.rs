//! `POST /api/population`: rough population around a point, derived from the
//! number of establishments the places directory returns.

use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Map, Value};
use tradearea_core::Coordinates;
use tradearea_places::{PlacesError, PopulationEstimate};

use super::AppState;

const REQUIRED_PARAMS: [&str; 3] = ["lat", "lng", "radius"];

/// Failure payloads. Every variant renders as `{error, details}` except
/// [`EndpointError::MissingParameters`], which echoes what it received.
#[derive(Debug)]
pub(super) enum EndpointError {
    MissingCredential,
    InvalidBody(String),
    MissingParameters(Map<String, Value>),
    Upstream(PlacesError),
}

impl IntoResponse for EndpointError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            EndpointError::MissingCredential => (
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({
                    "error": "Google Maps API key is not configured",
                    "details": "Environment variable GOOGLE_MAPS_API_KEY is not set",
                }),
            ),
            EndpointError::InvalidBody(details) => (
                StatusCode::BAD_REQUEST,
                json!({"error": "Invalid request body", "details": details}),
            ),
            EndpointError::MissingParameters(received) => (
                StatusCode::BAD_REQUEST,
                json!({"error": "Missing required parameters", "received": received}),
            ),
            EndpointError::Upstream(PlacesError::Api(message)) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({"error": "Google Places API error", "details": message}),
            ),
            EndpointError::Upstream(e) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({"error": "Failed to estimate population", "details": e.to_string()}),
            ),
        };
        (status, Json(body)).into_response()
    }
}

pub(super) async fn preflight() -> StatusCode {
    StatusCode::NO_CONTENT
}

/// Parameters must be present, numeric, and truthy, so `0` is rejected as
/// missing even though it is a valid latitude or longitude. Numeric strings
/// such as `"34.05"` are rejected too.
pub(super) async fn estimate(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<PopulationEstimate>, EndpointError> {
    let Some(places) = state.places.as_ref() else {
        tracing::error!("GOOGLE_MAPS_API_KEY not configured");
        return Err(EndpointError::MissingCredential);
    };

    // An empty body reads as `{}` and falls through to the parameter check.
    let raw: &[u8] = if body.is_empty() { b"{}" } else { &body };
    let payload: Value = serde_json::from_slice(raw).map_err(|e| {
        tracing::warn!(error = %e, "population request body is not valid JSON");
        EndpointError::InvalidBody(e.to_string())
    })?;

    let (lat, lng, radius) = required_params(&payload)?;
    tracing::info!(lat, lng, radius, "estimating population");

    let estimate = places
        .estimate_population(Coordinates::new(lng, lat), radius)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "population estimate failed");
            EndpointError::Upstream(e)
        })?;

    tracing::info!(
        population = estimate.population,
        place_count = estimate.place_count,
        "population estimated"
    );
    Ok(Json(estimate))
}

/// Returns `(lat, lng, radius)` or the raw values that were received.
fn required_params(payload: &Value) -> Result<(f64, f64, f64), EndpointError> {
    let get = |key: &str| {
        payload
            .get(key)
            .and_then(Value::as_f64)
            .filter(|n| n.abs() > 0.0)
    };

    match (get("lat"), get("lng"), get("radius")) {
        (Some(lat), Some(lng), Some(radius)) => Ok((lat, lng, radius)),
        _ => {
            let received = REQUIRED_PARAMS
                .iter()
                .filter_map(|key| {
                    payload
                        .get(*key)
                        .map(|value| ((*key).to_owned(), value.clone()))
                })
                .collect();
            tracing::warn!(%payload, "population request missing parameters");
            Err(EndpointError::MissingParameters(received))
        }
    }
}

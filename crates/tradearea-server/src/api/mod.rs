mod population;

use std::sync::Arc;

use axum::{
    extract::State,
    http::{header, HeaderName, HeaderValue, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Extension, Json, Router,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tower::ServiceBuilder;
use tower_http::{set_header::SetResponseHeaderLayer, trace::TraceLayer};
use tradearea_places::PlacesClient;

use crate::middleware::{request_id, RequestId};

/// Path the population endpoint was originally deployed under; kept so
/// existing front ends keep working.
const LEGACY_POPULATION_PATH: &str = "/.netlify/functions/getPopulation";

#[derive(Clone)]
pub struct AppState {
    /// `None` when `GOOGLE_MAPS_API_KEY` is unset. Population requests then
    /// fail with a configuration error instead of the server refusing to start.
    pub places: Option<Arc<PlacesClient>>,
}

#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub data: T,
    pub meta: ResponseMeta,
}

#[derive(Debug, Serialize)]
pub struct ResponseMeta {
    pub request_id: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
struct HealthData {
    status: &'static str,
    places: &'static str,
}

impl ResponseMeta {
    pub(super) fn new(request_id: String) -> Self {
        Self {
            request_id,
            timestamp: Utc::now(),
        }
    }
}

fn cors_header(name: HeaderName, value: &'static str) -> SetResponseHeaderLayer<HeaderValue> {
    SetResponseHeaderLayer::overriding(name, HeaderValue::from_static(value))
}

pub fn build_app(state: AppState) -> Router {
    let population_routes = post(population::estimate).options(population::preflight);

    Router::new()
        .route("/api/v1/health", get(health))
        .route("/api/population", population_routes.clone())
        .route(LEGACY_POPULATION_PATH, population_routes)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(axum::middleware::from_fn(request_id))
                .layer(cors_header(header::ACCESS_CONTROL_ALLOW_ORIGIN, "*"))
                .layer(cors_header(
                    header::ACCESS_CONTROL_ALLOW_HEADERS,
                    "Content-Type",
                ))
                .layer(cors_header(
                    header::ACCESS_CONTROL_ALLOW_METHODS,
                    "GET, POST, OPTIONS",
                )),
        )
        .with_state(state)
}

async fn health(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> impl IntoResponse {
    let data = HealthData {
        status: "ok",
        places: if state.places.is_some() {
            "configured"
        } else {
            "missing_credential"
        },
    };

    (
        StatusCode::OK,
        Json(ApiResponse {
            data,
            meta: ResponseMeta::new(req_id.0),
        }),
    )
}

use thiserror::Error;

/// Errors returned by the Mapbox geocoding client.
#[derive(Debug, Error)]
pub enum GeocodeError {
    /// Network or TLS failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Mapbox answered with a non-2xx status. `message` is the API's own
    /// explanation when the body carried one.
    #[error("geocoding failed with HTTP {status}: {message}")]
    UnexpectedStatus { status: u16, message: String },

    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid geocoder base URL '{0}'")]
    InvalidBaseUrl(String),
}

use std::path::PathBuf;

use thiserror::Error;
use tradearea_core::Coordinates;
use tradearea_geocode::GeocodeError;

/// Reasons a search aborts. Analysis failures are not here: they degrade
/// the result instead of aborting it.
#[derive(Debug, Error)]
pub enum SearchError {
    /// Bad user input. Raised before any network call.
    #[error("{0}")]
    Validation(String),

    #[error("Geocoding failed: {0}")]
    Geocode(#[from] GeocodeError),

    #[error("Address not found in the United States")]
    NotFound,

    #[error("Location must be within the United States (got {coordinates})")]
    OutOfBounds { coordinates: Coordinates },

    /// A newer search started before this one finished.
    #[error("search superseded by a newer search")]
    Superseded,

    #[error(transparent)]
    History(#[from] HistoryError),
}

#[derive(Debug, Error)]
pub enum HistoryError {
    #[error("failed to access history file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to encode history: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("no saved search for address \"{0}\"")]
    UnknownAddress(String),
}

#[derive(Debug, Error)]
pub enum PopulationClientError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The endpoint answered with a structured error payload.
    #[error("population endpoint returned HTTP {status}: {message}")]
    Endpoint { status: u16, message: String },

    #[error("invalid population endpoint URL '{0}'")]
    InvalidUrl(String),
}

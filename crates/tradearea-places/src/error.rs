use thiserror::Error;

#[derive(Debug, Error)]
pub enum PlacesError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP error! status: {status}")]
    UnexpectedStatus { status: u16 },

    /// The directory answered 200 but embedded an `error_message`.
    #[error("Places API error: {0}")]
    Api(String),

    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid places base URL '{0}'")]
    InvalidBaseUrl(String),
}

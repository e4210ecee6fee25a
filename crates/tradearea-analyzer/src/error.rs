use thiserror::Error;

#[derive(Debug, Error)]
pub enum AnalyzerError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("analysis provider returned HTTP {status}: {message}")]
    UnexpectedStatus { status: u16, message: String },

    /// The completion had no choices or an empty message.
    #[error("analysis provider returned an empty response")]
    EmptyResponse,

    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid analyzer base URL '{0}'")]
    InvalidBaseUrl(String),
}

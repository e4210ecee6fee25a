use std::net::SocketAddr;
use std::path::PathBuf;

use crate::ConfigError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub bind_addr: SocketAddr,
    pub log_level: String,
    pub request_timeout_secs: u64,
    /// Places directory credential. Optional at startup; the population
    /// endpoint reports its absence per request.
    pub places_api_key: Option<String>,
    pub places_base_url: String,
    pub mapbox_token: Option<String>,
    pub geocoder_base_url: String,
    pub analyzer_api_key: Option<String>,
    pub analyzer_base_url: String,
    pub analyzer_model: String,
    pub population_url: String,
    pub history_path: PathBuf,
    pub recent_search_limit: usize,
}

impl AppConfig {
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingEnvVar`] when `MAPBOX_TOKEN` is unset.
    pub fn require_mapbox_token(&self) -> Result<&str, ConfigError> {
        self.mapbox_token
            .as_deref()
            .ok_or_else(|| ConfigError::MissingEnvVar("MAPBOX_TOKEN".to_string()))
    }

    /// # Errors
    ///
    /// Returns [`ConfigError::MissingEnvVar`] when `OPENAI_API_KEY` is unset.
    pub fn require_analyzer_api_key(&self) -> Result<&str, ConfigError> {
        self.analyzer_api_key
            .as_deref()
            .ok_or_else(|| ConfigError::MissingEnvVar("OPENAI_API_KEY".to_string()))
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("bind_addr", &self.bind_addr)
            .field("log_level", &self.log_level)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field(
                "places_api_key",
                &self.places_api_key.as_ref().map(|_| "[redacted]"),
            )
            .field("places_base_url", &self.places_base_url)
            .field(
                "mapbox_token",
                &self.mapbox_token.as_ref().map(|_| "[redacted]"),
            )
            .field("geocoder_base_url", &self.geocoder_base_url)
            .field(
                "analyzer_api_key",
                &self.analyzer_api_key.as_ref().map(|_| "[redacted]"),
            )
            .field("analyzer_base_url", &self.analyzer_base_url)
            .field("analyzer_model", &self.analyzer_model)
            .field("population_url", &self.population_url)
            .field("history_path", &self.history_path)
            .field("recent_search_limit", &self.recent_search_limit)
            .finish()
    }
}

use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Provider credentials are optional here. Each consumer decides whether a
/// missing credential is fatal (the CLI) or a per-request error (the
/// population endpoint).
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::SocketAddr;
    use std::path::PathBuf;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    // Empty values count as unset so `KEY=` in a .env file disables a provider.
    let optional = |var: &str| -> Option<String> {
        lookup(var)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    };

    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
    };

    let parse_addr = |var: &str, default: &str| -> Result<SocketAddr, ConfigError> {
        or_default(var, default)
            .parse::<SocketAddr>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        or_default(var, default)
            .parse::<u64>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        or_default(var, default)
            .parse::<usize>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let env = parse_environment(&or_default("TRADEAREA_ENV", "development"))?;
    let bind_addr = parse_addr("TRADEAREA_BIND_ADDR", "0.0.0.0:8888")?;
    let log_level = or_default("TRADEAREA_LOG_LEVEL", "info");

    let request_timeout_secs = parse_u64("TRADEAREA_REQUEST_TIMEOUT_SECS", "30")?;
    if request_timeout_secs == 0 {
        return Err(invalid(
            "TRADEAREA_REQUEST_TIMEOUT_SECS",
            "must be at least 1".to_string(),
        ));
    }

    let places_api_key = optional("GOOGLE_MAPS_API_KEY");
    let places_base_url = or_default("TRADEAREA_PLACES_BASE_URL", "https://maps.googleapis.com");
    let mapbox_token = optional("MAPBOX_TOKEN");
    let geocoder_base_url = or_default("TRADEAREA_GEOCODER_BASE_URL", "https://api.mapbox.com");
    let analyzer_api_key = optional("OPENAI_API_KEY");
    let analyzer_base_url = or_default("TRADEAREA_ANALYZER_BASE_URL", "https://api.openai.com");
    let analyzer_model = or_default("TRADEAREA_ANALYZER_MODEL", "gpt-4o-mini");
    let population_url = or_default(
        "TRADEAREA_POPULATION_URL",
        "http://127.0.0.1:8888/api/population",
    );
    let history_path = PathBuf::from(or_default("TRADEAREA_HISTORY_PATH", "./data/history.json"));

    let recent_search_limit = parse_usize("TRADEAREA_RECENT_LIMIT", "10")?;
    if recent_search_limit == 0 {
        return Err(invalid(
            "TRADEAREA_RECENT_LIMIT",
            "must be at least 1".to_string(),
        ));
    }

    Ok(AppConfig {
        env,
        bind_addr,
        log_level,
        request_timeout_secs,
        places_api_key,
        places_base_url,
        mapbox_token,
        geocoder_base_url,
        analyzer_api_key,
        analyzer_base_url,
        analyzer_model,
        population_url,
        history_path,
        recent_search_limit,
    })
}

/// Parse a string into an `Environment` variant.
fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "TRADEAREA_ENV".to_string(),
            reason: format!("expected development, test, or production; got \"{other}\""),
        }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;

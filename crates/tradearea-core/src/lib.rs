//! Shared domain types, configuration, and geometry for the trade-area
//! workspace.

pub mod app_config;
pub mod config;
pub mod geo;
pub mod location;
pub mod projection;

use thiserror::Error;

pub use app_config::{AppConfig, Environment};
pub use config::{load_app_config, load_app_config_from_env};
pub use geo::{
    miles_to_meters, BoundingBox, Coordinates, MILES_TO_METERS, TRADE_AREA_RADIUS_MILES, US_BOUNDS,
};
pub use location::{
    AnalysisContent, AreaType, AreaTypeRanking, LocationAnalysis, LocationData, LocationDetails,
    PopulationRanking, Rankings, StorageData,
};
pub use projection::{pixel_radius, ScreenPoint, TradeAreaOverlay, Viewport};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}

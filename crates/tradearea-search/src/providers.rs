//! Seams between the orchestrator and the external providers.

use async_trait::async_trait;
use tradearea_analyzer::{AnalyzerClient, AnalyzerError};
use tradearea_core::{Coordinates, LocationAnalysis};
use tradearea_geocode::{GeocodeCandidate, GeocodeError, MapboxClient};

/// Resolves free text to the best US street-address match.
#[async_trait]
pub trait Geocoder: Send + Sync {
    async fn geocode(&self, address: &str) -> Result<Option<GeocodeCandidate>, GeocodeError>;
}

/// Produces a generated analysis for a geocoded address.
///
/// Implementations may report failure either by returning `Err` or by
/// returning an analysis whose `error` is set; callers treat both alike.
#[async_trait]
pub trait LocationAnalyzer: Send + Sync {
    async fn analyze(
        &self,
        address: &str,
        coordinates: Coordinates,
    ) -> Result<LocationAnalysis, AnalyzerError>;
}

#[async_trait]
impl Geocoder for MapboxClient {
    async fn geocode(&self, address: &str) -> Result<Option<GeocodeCandidate>, GeocodeError> {
        MapboxClient::geocode(self, address).await
    }
}

#[async_trait]
impl LocationAnalyzer for AnalyzerClient {
    async fn analyze(
        &self,
        address: &str,
        coordinates: Coordinates,
    ) -> Result<LocationAnalysis, AnalyzerError> {
        AnalyzerClient::analyze(self, address, coordinates).await
    }
}

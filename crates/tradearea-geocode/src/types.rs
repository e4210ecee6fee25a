use serde::Deserialize;
use tradearea_core::Coordinates;

/// The best match for a free-text address.
#[derive(Debug, Clone, PartialEq)]
pub struct GeocodeCandidate {
    /// Mapbox's canonical `place_name`, e.g.
    /// `"100 Congress Ave, Austin, Texas 78701, United States"`.
    pub formatted_address: String,
    pub coordinates: Coordinates,
}

#[derive(Debug, Deserialize)]
pub(crate) struct FeatureCollection {
    #[serde(default)]
    pub features: Vec<Feature>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Feature {
    pub place_name: String,
    /// `[longitude, latitude]`
    pub center: Coordinates,
}

impl From<Feature> for GeocodeCandidate {
    fn from(feature: Feature) -> Self {
        Self {
            formatted_address: feature.place_name,
            coordinates: feature.center,
        }
    }
}

/// Error body Mapbox returns alongside 4xx statuses.
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorBody {
    pub message: Option<String>,
}

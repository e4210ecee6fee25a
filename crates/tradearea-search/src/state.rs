use tradearea_core::{Coordinates, LocationAnalysis, LocationData};

/// A successfully geocoded, in-bounds address.
#[derive(Debug, Clone, PartialEq)]
pub struct GeocodedLocation {
    pub address: String,
    pub coordinates: Coordinates,
    /// Epoch milliseconds.
    pub timestamp: i64,
}

impl GeocodedLocation {
    #[must_use]
    pub fn with_analysis(self, analysis: LocationAnalysis) -> LocationData {
        LocationData {
            address: self.address,
            coordinates: self.coordinates,
            timestamp: self.timestamp,
            is_favorite: false,
            analysis: Some(analysis),
        }
    }
}

impl From<&LocationData> for GeocodedLocation {
    fn from(location: &LocationData) -> Self {
        Self {
            address: location.address.clone(),
            coordinates: location.coordinates,
            timestamp: location.timestamp,
        }
    }
}

/// What the front end should currently show.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum SearchState {
    #[default]
    Idle,
    /// Geocoded; the map can be drawn while analysis runs.
    Pending { location: GeocodedLocation },
    /// Analysis attached. `analysis` may be degraded.
    Complete {
        location: GeocodedLocation,
        analysis: LocationAnalysis,
    },
}

impl SearchState {
    #[must_use]
    pub fn location(&self) -> Option<&GeocodedLocation> {
        match self {
            SearchState::Idle => None,
            SearchState::Pending { location } | SearchState::Complete { location, .. } => {
                Some(location)
            }
        }
    }

    #[must_use]
    pub fn is_analyzing(&self) -> bool {
        matches!(self, SearchState::Pending { .. })
    }
}

impl From<&LocationData> for SearchState {
    /// A stored entry without an analysis shows as pending.
    fn from(location: &LocationData) -> Self {
        let geocoded = GeocodedLocation::from(location);
        match &location.analysis {
            Some(analysis) => SearchState::Complete {
                location: geocoded,
                analysis: analysis.clone(),
            },
            None => SearchState::Pending { location: geocoded },
        }
    }
}

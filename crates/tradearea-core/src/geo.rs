//! Coordinates, unit conversion, and the US bounding box.

use serde::{Deserialize, Serialize};

/// Statute miles to meters.
pub const MILES_TO_METERS: f64 = 1609.34;

/// Radius of the trade area drawn around every searched location.
pub const TRADE_AREA_RADIUS_MILES: f64 = 5.0;

#[must_use]
pub fn miles_to_meters(miles: f64) -> f64 {
    miles * MILES_TO_METERS
}

/// A WGS84 point. Serialized as `[longitude, latitude]` to match the
/// persisted history format and the geocoder's `center` field.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 2]", into = "[f64; 2]")]
pub struct Coordinates {
    pub longitude: f64,
    pub latitude: f64,
}

impl Coordinates {
    #[must_use]
    pub const fn new(longitude: f64, latitude: f64) -> Self {
        Self {
            longitude,
            latitude,
        }
    }

    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.longitude.is_finite() && self.latitude.is_finite()
    }
}

impl From<[f64; 2]> for Coordinates {
    fn from([longitude, latitude]: [f64; 2]) -> Self {
        Self::new(longitude, latitude)
    }
}

impl From<Coordinates> for [f64; 2] {
    fn from(c: Coordinates) -> Self {
        [c.longitude, c.latitude]
    }
}

impl std::fmt::Display for Coordinates {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.6}, {:.6}", self.latitude, self.longitude)
    }
}

/// Axis-aligned lat/lng rectangle. Bounds are inclusive.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub min_lng: f64,
    pub min_lat: f64,
    pub max_lng: f64,
    pub max_lat: f64,
}

impl BoundingBox {
    /// Non-finite coordinates are never contained.
    #[must_use]
    pub fn contains(&self, point: Coordinates) -> bool {
        point.is_finite()
            && point.longitude >= self.min_lng
            && point.longitude <= self.max_lng
            && point.latitude >= self.min_lat
            && point.latitude <= self.max_lat
    }
}

/// Continental US plus Alaska, Hawaii and the Caribbean territories.
pub const US_BOUNDS: BoundingBox = BoundingBox {
    min_lng: -167.276_413,
    min_lat: 15.436_089,
    max_lng: -52.233_040,
    max_lat: 72.553_992,
};

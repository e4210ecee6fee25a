//! Forward geocoding of US street addresses through the Mapbox Geocoding API.

pub mod client;
pub mod error;
pub mod types;

pub use client::MapboxClient;
pub use error::GeocodeError;
pub use types::GeocodeCandidate;

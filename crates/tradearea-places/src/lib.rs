//! Google Places nearby-search client and the place-count population proxy.

pub mod client;
pub mod error;
pub mod population;
pub mod types;

pub use client::PlacesClient;
pub use error::PlacesError;
pub use population::{estimate_population, round_to_nearest_hundred, PopulationEstimate};
pub use types::{NearbySearch, Place};

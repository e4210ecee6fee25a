//! Client-side search flow: geocode an address, enforce US bounds, attach a
//! generated analysis, and record the result in local history.
//!
//! The orchestrator publishes each search as two observable states
//! ([`SearchState::Pending`] once geocoded, [`SearchState::Complete`] once
//! analyzed) so a front end can draw the map before analysis finishes.

pub mod error;
pub mod history;
pub mod orchestrator;
pub mod population;
pub mod providers;
pub mod state;

pub use error::{HistoryError, PopulationClientError, SearchError};
pub use history::HistoryStore;
pub use orchestrator::SearchOrchestrator;
pub use population::PopulationClient;
pub use providers::{Geocoder, LocationAnalyzer};
pub use state::{GeocodedLocation, SearchState};

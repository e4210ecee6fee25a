//! Order-of-magnitude population proxy derived from a place count.
//!
//! This is not a demographic model: every establishment found counts as a
//! fixed number of residents.

use serde::{Deserialize, Serialize};

/// Residents attributed to each establishment found.
pub const PEOPLE_PER_PLACE: u64 = 1000;

/// Body of a successful population response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PopulationEstimate {
    pub population: u64,
    pub place_count: u64,
}

impl PopulationEstimate {
    #[must_use]
    pub fn from_place_count(place_count: u64) -> Self {
        Self {
            population: estimate_population(place_count, PEOPLE_PER_PLACE),
            place_count,
        }
    }
}

/// Rounds half up, so 750 becomes 800 and 749 becomes 700.
#[must_use]
pub fn round_to_nearest_hundred(raw: u64) -> u64 {
    raw.saturating_add(50) / 100 * 100
}

#[must_use]
pub fn estimate_population(place_count: u64, people_per_place: u64) -> u64 {
    round_to_nearest_hundred(place_count.saturating_mul(people_per_place))
}

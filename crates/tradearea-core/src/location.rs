//! Search results, generated analyses, and the persisted history document.
//!
//! Field names on the wire follow the stored JSON format (`isFavorite`,
//! `recentSearches`, `areaType`, snake_case analysis sections), so history
//! files written by earlier releases keep loading.

use serde::{Deserialize, Serialize};

use crate::geo::Coordinates;

/// A completed search: the geocoded address plus, once available, its analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationData {
    pub address: String,
    pub coordinates: Coordinates,
    /// Creation time in epoch milliseconds.
    pub timestamp: i64,
    #[serde(default)]
    pub is_favorite: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub analysis: Option<LocationAnalysis>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationDetails {
    pub name: String,
    pub address: String,
    pub coordinates: Coordinates,
}

/// Coarse settlement classification. Any unrecognized provider value maps to
/// [`AreaType::Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String")]
pub enum AreaType {
    Rural,
    Suburban,
    Urban,
    Error,
}

impl AreaType {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            AreaType::Rural => "Rural",
            AreaType::Suburban => "Suburban",
            AreaType::Urban => "Urban",
            AreaType::Error => "Error",
        }
    }
}

impl From<&str> for AreaType {
    fn from(value: &str) -> Self {
        match value.trim() {
            "Rural" => AreaType::Rural,
            "Suburban" => AreaType::Suburban,
            "Urban" => AreaType::Urban,
            _ => AreaType::Error,
        }
    }
}

impl From<String> for AreaType {
    fn from(value: String) -> Self {
        AreaType::from(value.as_str())
    }
}

impl std::fmt::Display for AreaType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AreaTypeRanking {
    pub value: AreaType,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PopulationRanking {
    #[serde(default)]
    pub value: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Rankings {
    pub area_type: AreaTypeRanking,
    pub population: PopulationRanking,
}

/// The six free-text sections of a generated analysis.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AnalysisContent {
    #[serde(default)]
    pub demographic_profile: String,
    #[serde(default)]
    pub lifestyle_trends: String,
    #[serde(default)]
    pub relevant_industries: String,
    #[serde(default)]
    pub physical_characteristics: String,
    #[serde(default)]
    pub type_of_center: String,
    #[serde(default)]
    pub nearby_businesses: String,
}

impl AnalysisContent {
    /// Returns `(heading, body)` pairs in display order.
    #[must_use]
    pub fn sections(&self) -> [(&'static str, &str); 6] {
        [
            ("Demographic Profile", &self.demographic_profile),
            ("Lifestyle & Cultural Trends", &self.lifestyle_trends),
            ("Relevant Industries", &self.relevant_industries),
            ("Physical Characteristics", &self.physical_characteristics),
            ("Type of Center", &self.type_of_center),
            ("Nearby Businesses", &self.nearby_businesses),
        ]
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sections().iter().all(|(_, body)| body.is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationAnalysis {
    pub location: LocationDetails,
    pub rankings: Rankings,
    pub analysis: AnalysisContent,
    /// When set and non-empty, consumers must show this message and nothing else.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl LocationAnalysis {
    /// Builds the placeholder attached when analysis fails: `error` is set and
    /// every text section is empty.
    #[must_use]
    pub fn degraded(address: &str, coordinates: Coordinates, message: impl Into<String>) -> Self {
        Self {
            location: LocationDetails {
                name: address.to_owned(),
                address: address.to_owned(),
                coordinates,
            },
            rankings: Rankings {
                area_type: AreaTypeRanking {
                    value: AreaType::Error,
                    description: String::new(),
                },
                population: PopulationRanking::default(),
            },
            analysis: AnalysisContent::default(),
            error: Some(message.into()),
        }
    }

    #[must_use]
    pub fn error_message(&self) -> Option<&str> {
        self.error.as_deref().filter(|e| !e.is_empty())
    }

    #[must_use]
    pub fn is_degraded(&self) -> bool {
        self.error_message().is_some()
    }
}

/// The persisted history document.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StorageData {
    #[serde(default)]
    pub recent_searches: Vec<LocationData>,
    #[serde(default)]
    pub favorites: Vec<LocationData>,
}

use serde::Deserialize;

/// Raw `nearbysearch/json` response. Only the fields the estimator reads.
#[derive(Debug, Clone, Deserialize)]
pub struct NearbySearch {
    #[serde(default)]
    pub results: Vec<Place>,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub error_message: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Place {
    #[serde(default)]
    pub place_id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub types: Vec<String>,
}

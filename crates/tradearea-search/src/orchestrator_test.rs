use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Notify;
use tradearea_analyzer::AnalyzerError;
use tradearea_core::{
    AnalysisContent, AreaType, AreaTypeRanking, Coordinates, LocationAnalysis, LocationDetails,
    PopulationRanking, Rankings,
};
use tradearea_geocode::{GeocodeCandidate, GeocodeError};

use super::SearchOrchestrator;
use crate::error::SearchError;
use crate::history::HistoryStore;
use crate::providers::{Geocoder, LocationAnalyzer};
use crate::state::SearchState;

const AUSTIN: Coordinates = Coordinates::new(-97.7431, 30.2672);
const LONDON: Coordinates = Coordinates::new(-0.1276, 51.5072);

#[derive(Default)]
struct FakeGeocoder {
    known: HashMap<&'static str, Coordinates>,
    fail: bool,
    calls: AtomicUsize,
    /// Addresses starting with "Late" wait for this before answering.
    release: Arc<Notify>,
}

impl FakeGeocoder {
    fn with(entries: &[(&'static str, Coordinates)]) -> Self {
        Self {
            known: entries.iter().copied().collect(),
            ..Self::default()
        }
    }
}

#[async_trait]
impl Geocoder for FakeGeocoder {
    async fn geocode(&self, address: &str) -> Result<Option<GeocodeCandidate>, GeocodeError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if address.starts_with("Late") {
            self.release.notified().await;
        }
        if self.fail {
            return Err(GeocodeError::UnexpectedStatus {
                status: 500,
                message: "geocoder down".to_string(),
            });
        }
        Ok(self.known.get(address).map(|coordinates| GeocodeCandidate {
            formatted_address: address.to_string(),
            coordinates: *coordinates,
        }))
    }
}

#[derive(Clone, Copy, Default)]
enum AnalyzerMode {
    #[default]
    Succeed,
    Fail,
    InBandError,
}

#[derive(Default)]
struct FakeAnalyzer {
    mode: AnalyzerMode,
    /// Addresses starting with "Slow" wait for this before answering.
    release: Arc<Notify>,
}

fn full_analysis(address: &str, coordinates: Coordinates) -> LocationAnalysis {
    LocationAnalysis {
        location: LocationDetails {
            name: "Downtown".to_string(),
            address: address.to_string(),
            coordinates,
        },
        rankings: Rankings {
            area_type: AreaTypeRanking {
                value: AreaType::Urban,
                description: "Dense core".to_string(),
            },
            population: PopulationRanking {
                value: "High".to_string(),
                description: "Large daytime population".to_string(),
            },
        },
        analysis: AnalysisContent {
            demographic_profile: "Young professionals".to_string(),
            lifestyle_trends: "Live music".to_string(),
            relevant_industries: "Tech".to_string(),
            physical_characteristics: "Walkable grid".to_string(),
            type_of_center: "Urban core".to_string(),
            nearby_businesses: "Cafes".to_string(),
        },
        error: None,
    }
}

#[async_trait]
impl LocationAnalyzer for FakeAnalyzer {
    async fn analyze(
        &self,
        address: &str,
        coordinates: Coordinates,
    ) -> Result<LocationAnalysis, AnalyzerError> {
        if address.starts_with("Slow") {
            self.release.notified().await;
        }
        match self.mode {
            AnalyzerMode::Succeed => Ok(full_analysis(address, coordinates)),
            AnalyzerMode::Fail => Err(AnalyzerError::EmptyResponse),
            AnalyzerMode::InBandError => {
                let mut analysis = full_analysis(address, coordinates);
                analysis.error = Some("quota exceeded".to_string());
                Ok(analysis)
            }
        }
    }
}

fn orchestrator(
    geocoder: FakeGeocoder,
    analyzer: FakeAnalyzer,
) -> SearchOrchestrator<FakeGeocoder, FakeAnalyzer> {
    SearchOrchestrator::new(geocoder, analyzer, HistoryStore::in_memory(10))
}

#[tokio::test]
async fn blank_input_is_rejected_before_geocoding() {
    let orch = orchestrator(FakeGeocoder::default(), FakeAnalyzer::default());
    let err = orch.search("   ").await.unwrap_err();
    assert!(matches!(err, SearchError::Validation(ref m) if m == "Please enter an address"));
    assert_eq!(orch.geocoder.calls.load(Ordering::SeqCst), 0);
    assert_eq!(orch.current_state(), SearchState::Idle);
}

#[tokio::test]
async fn input_is_trimmed_before_geocoding() {
    let orch = orchestrator(
        FakeGeocoder::with(&[("1 Main St", AUSTIN)]),
        FakeAnalyzer::default(),
    );
    let location = orch.search("  1 Main St \n").await.unwrap();
    assert_eq!(location.address, "1 Main St");
}

#[tokio::test]
async fn successful_search_returns_in_bounds_location_and_persists() {
    let orch = orchestrator(
        FakeGeocoder::with(&[("1 Main St", AUSTIN)]),
        FakeAnalyzer::default(),
    );
    let location = orch.search("1 Main St").await.unwrap();

    assert_eq!(location.coordinates, AUSTIN);
    assert!(tradearea_core::US_BOUNDS.contains(location.coordinates));
    let analysis = location.analysis.as_ref().unwrap();
    assert!(!analysis.is_degraded());
    assert_eq!(analysis.rankings.area_type.value, AreaType::Urban);

    let history = orch.history().await;
    assert_eq!(history.recent_searches(), std::slice::from_ref(&location));

    match orch.current_state() {
        SearchState::Complete { location: shown, .. } => assert_eq!(shown.address, "1 Main St"),
        other => panic!("expected Complete, got {other:?}"),
    }
}

#[tokio::test]
async fn no_match_is_not_found() {
    let orch = orchestrator(FakeGeocoder::default(), FakeAnalyzer::default());
    let err = orch.search("nowhere").await.unwrap_err();
    assert!(matches!(err, SearchError::NotFound));
    assert_eq!(err.to_string(), "Address not found in the United States");
    assert!(orch.history().await.recent_searches().is_empty());
}

#[tokio::test]
async fn geocoder_failure_aborts_search() {
    let geocoder = FakeGeocoder {
        fail: true,
        ..FakeGeocoder::default()
    };
    let orch = orchestrator(geocoder, FakeAnalyzer::default());
    let err = orch.search("1 Main St").await.unwrap_err();
    assert!(matches!(err, SearchError::Geocode(_)));
    assert!(orch.history().await.recent_searches().is_empty());
}

#[tokio::test]
async fn out_of_bounds_result_is_rejected_and_not_persisted() {
    let orch = orchestrator(
        FakeGeocoder::with(&[("10 Downing St", LONDON)]),
        FakeAnalyzer::default(),
    );
    let err = orch.search("10 Downing St").await.unwrap_err();
    assert!(matches!(err, SearchError::OutOfBounds { coordinates } if coordinates == LONDON));
    assert!(err
        .to_string()
        .starts_with("Location must be within the United States"));
    assert!(orch.history().await.recent_searches().is_empty());
    assert_eq!(orch.current_state(), SearchState::Idle);
}

#[tokio::test]
async fn analyzer_failure_degrades_but_still_persists() {
    let orch = orchestrator(
        FakeGeocoder::with(&[("1 Main St", AUSTIN)]),
        FakeAnalyzer {
            mode: AnalyzerMode::Fail,
            ..FakeAnalyzer::default()
        },
    );
    let location = orch.search("1 Main St").await.unwrap();

    let analysis = location.analysis.as_ref().unwrap();
    assert!(analysis.error_message().is_some_and(|m| !m.is_empty()));
    assert!(analysis.analysis.is_empty());
    assert_eq!(analysis.rankings.area_type.value, AreaType::Error);
    assert_eq!(orch.history().await.recent_searches().len(), 1);
}

#[tokio::test]
async fn in_band_analysis_error_is_treated_like_a_failure() {
    let orch = orchestrator(
        FakeGeocoder::with(&[("1 Main St", AUSTIN)]),
        FakeAnalyzer {
            mode: AnalyzerMode::InBandError,
            ..FakeAnalyzer::default()
        },
    );
    let location = orch.search("1 Main St").await.unwrap();

    let analysis = location.analysis.unwrap();
    assert_eq!(analysis.error_message(), Some("quota exceeded"));
    assert!(analysis.analysis.is_empty());
}

#[tokio::test]
async fn newer_search_supersedes_pending_one() {
    let orch = Arc::new(orchestrator(
        FakeGeocoder::with(&[("Slow Rd", AUSTIN), ("1 Main St", AUSTIN)]),
        FakeAnalyzer::default(),
    ));
    let mut rx = orch.subscribe();

    let slow = tokio::spawn({
        let orch = Arc::clone(&orch);
        async move { orch.search("Slow Rd").await }
    });
    rx.wait_for(|state| state.is_analyzing()).await.unwrap();

    let fast = orch.search("1 Main St").await.unwrap();
    let slow_result = slow.await.unwrap();

    assert!(matches!(slow_result, Err(SearchError::Superseded)));
    match orch.current_state() {
        SearchState::Complete { location, .. } => assert_eq!(location.address, fast.address),
        other => panic!("expected Complete, got {other:?}"),
    }
    let history = orch.history().await;
    assert_eq!(history.recent_searches().len(), 1);
    assert_eq!(history.recent_searches()[0].address, "1 Main St");
}

#[tokio::test]
async fn failed_newer_search_leaves_pending_search_intact() {
    let analyzer = FakeAnalyzer::default();
    let release = Arc::clone(&analyzer.release);
    let orch = Arc::new(orchestrator(
        FakeGeocoder::with(&[("Slow Rd", AUSTIN), ("10 Downing St", LONDON)]),
        analyzer,
    ));
    let mut rx = orch.subscribe();

    let slow = tokio::spawn({
        let orch = Arc::clone(&orch);
        async move { orch.search("Slow Rd").await }
    });
    rx.wait_for(|state| state.is_analyzing()).await.unwrap();

    assert!(matches!(
        orch.search("nowhere").await,
        Err(SearchError::NotFound)
    ));
    assert!(matches!(
        orch.search("10 Downing St").await,
        Err(SearchError::OutOfBounds { .. })
    ));
    match orch.current_state() {
        SearchState::Pending { location } => assert_eq!(location.address, "Slow Rd"),
        other => panic!("expected Pending, got {other:?}"),
    }

    release.notify_one();
    let completed = slow.await.unwrap().unwrap();
    assert_eq!(completed.address, "Slow Rd");
    match orch.current_state() {
        SearchState::Complete { location, .. } => assert_eq!(location.address, "Slow Rd"),
        other => panic!("expected Complete, got {other:?}"),
    }
    let history = orch.history().await;
    assert_eq!(history.recent_searches().len(), 1);
    assert_eq!(history.recent_searches()[0].address, "Slow Rd");
}

#[tokio::test]
async fn older_search_geocoded_late_does_not_replace_newer_result() {
    let geocoder = FakeGeocoder::with(&[("Late Ln", AUSTIN), ("1 Main St", AUSTIN)]);
    let release = Arc::clone(&geocoder.release);
    let orch = Arc::new(orchestrator(geocoder, FakeAnalyzer::default()));

    let late = tokio::spawn({
        let orch = Arc::clone(&orch);
        async move { orch.search("Late Ln").await }
    });
    while orch.geocoder.calls.load(Ordering::SeqCst) == 0 {
        tokio::task::yield_now().await;
    }

    let newer = orch.search("1 Main St").await.unwrap();
    release.notify_one();

    assert!(matches!(late.await.unwrap(), Err(SearchError::Superseded)));
    match orch.current_state() {
        SearchState::Complete { location, .. } => assert_eq!(location.address, newer.address),
        other => panic!("expected Complete, got {other:?}"),
    }
    let history = orch.history().await;
    assert_eq!(history.recent_searches().len(), 1);
    assert_eq!(history.recent_searches()[0].address, "1 Main St");
}

#[tokio::test]
async fn cancel_active_stops_a_pending_search() {
    let orch = Arc::new(orchestrator(
        FakeGeocoder::with(&[("Slow Rd", AUSTIN)]),
        FakeAnalyzer::default(),
    ));
    let mut rx = orch.subscribe();

    let slow = tokio::spawn({
        let orch = Arc::clone(&orch);
        async move { orch.search("Slow Rd").await }
    });
    rx.wait_for(|state| state.is_analyzing()).await.unwrap();
    orch.cancel_active();

    assert!(matches!(slow.await.unwrap(), Err(SearchError::Superseded)));
    assert!(orch.history().await.recent_searches().is_empty());
    assert!(orch.current_state().is_analyzing());
}

#[tokio::test]
async fn timestamps_never_decrease() {
    let orch = orchestrator(
        FakeGeocoder::with(&[("A St", AUSTIN), ("B St", AUSTIN)]),
        FakeAnalyzer::default(),
    );
    let first = orch.search("A St").await.unwrap();
    let second = orch.search("B St").await.unwrap();
    assert!(second.timestamp >= first.timestamp);
}

#[tokio::test]
async fn re_searching_a_favorite_keeps_the_flag() {
    let orch = orchestrator(
        FakeGeocoder::with(&[("1 Main St", AUSTIN)]),
        FakeAnalyzer::default(),
    );
    orch.search("1 Main St").await.unwrap();
    orch.history().await.toggle_favorite("1 Main St").await.unwrap();

    let again = orch.search("1 Main St").await.unwrap();
    assert!(again.is_favorite);
    let history = orch.history().await;
    assert_eq!(history.favorites().len(), 1);
    assert_eq!(history.recent_searches().len(), 1);
}

#[tokio::test]
async fn selecting_a_stored_location_presents_it() {
    let orch = orchestrator(
        FakeGeocoder::with(&[("1 Main St", AUSTIN)]),
        FakeAnalyzer::default(),
    );
    let location = orch.search("1 Main St").await.unwrap();
    let mut without_analysis = location.clone();
    without_analysis.analysis = None;

    orch.select_location(&without_analysis);
    assert!(orch.current_state().is_analyzing());

    orch.select_location(&location);
    assert!(matches!(
        orch.current_state(),
        SearchState::Complete { .. }
    ));
}

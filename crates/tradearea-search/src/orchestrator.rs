//! The search flow: validate, geocode, bounds check, analyze, persist.

use std::sync::atomic::{AtomicI64, AtomicU64, Ordering};
use std::sync::Mutex as StdMutex;

use tokio::sync::{watch, Mutex, MutexGuard};
use tokio_util::sync::CancellationToken;
use tradearea_analyzer::AnalyzerError;
use tradearea_core::{LocationAnalysis, LocationData, US_BOUNDS};

use crate::error::SearchError;
use crate::history::HistoryStore;
use crate::providers::{Geocoder, LocationAnalyzer};
use crate::state::{GeocodedLocation, SearchState};

#[derive(Debug, Default)]
struct ActiveSearch {
    generation: u64,
    token: CancellationToken,
}

/// Runs searches one at a time against injected providers and an injected
/// history store.
///
/// Each search takes a ticket when it starts. Once geocoded and in bounds it
/// claims the presented state, cancelling whichever search held it. A search
/// that fails before that point leaves the running one alone, and a search
/// whose ticket is older than the current holder's is dropped as superseded.
pub struct SearchOrchestrator<G, A> {
    geocoder: G,
    analyzer: A,
    history: Mutex<HistoryStore>,
    state: watch::Sender<SearchState>,
    active: StdMutex<ActiveSearch>,
    tickets: AtomicU64,
    last_timestamp: AtomicI64,
}

impl<G, A> SearchOrchestrator<G, A>
where
    G: Geocoder,
    A: LocationAnalyzer,
{
    #[must_use]
    pub fn new(geocoder: G, analyzer: A, history: HistoryStore) -> Self {
        let (state, _) = watch::channel(SearchState::Idle);
        Self {
            geocoder,
            analyzer,
            history: Mutex::new(history),
            state,
            active: StdMutex::new(ActiveSearch::default()),
            tickets: AtomicU64::new(0),
            last_timestamp: AtomicI64::new(i64::MIN),
        }
    }

    /// Observes the presented state. The receiver sees `Pending` as soon as
    /// a search is geocoded and `Complete` once its analysis is attached.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<SearchState> {
        self.state.subscribe()
    }

    #[must_use]
    pub fn current_state(&self) -> SearchState {
        self.state.borrow().clone()
    }

    pub async fn history(&self) -> MutexGuard<'_, HistoryStore> {
        self.history.lock().await
    }

    /// Searches for `address_text` and returns the completed location.
    ///
    /// # Errors
    ///
    /// - [`SearchError::Validation`] for blank input, before any network call
    /// - [`SearchError::Geocode`] or [`SearchError::NotFound`] from the geocoder
    /// - [`SearchError::OutOfBounds`] if the match lies outside the US
    /// - [`SearchError::Superseded`] if a newer search claimed the state first
    /// - [`SearchError::History`] if the result could not be saved
    ///
    /// Analysis failures are not errors; they produce a degraded analysis.
    pub async fn search(&self, address_text: &str) -> Result<LocationData, SearchError> {
        let query = address_text.trim();
        if query.is_empty() {
            return Err(SearchError::Validation("Please enter an address".to_string()));
        }

        let generation = self.next_ticket();

        let Some(candidate) = self.geocoder.geocode(query).await? else {
            tracing::info!(%query, "no geocoding match");
            return Err(SearchError::NotFound);
        };

        if !US_BOUNDS.contains(candidate.coordinates) {
            tracing::warn!(
                address = %candidate.formatted_address,
                coordinates = %candidate.coordinates,
                "geocoded location outside US bounds"
            );
            return Err(SearchError::OutOfBounds {
                coordinates: candidate.coordinates,
            });
        }

        let Some(token) = self.begin(generation) else {
            return Err(SearchError::Superseded);
        };

        let location = GeocodedLocation {
            address: candidate.formatted_address,
            coordinates: candidate.coordinates,
            timestamp: self.next_timestamp(),
        };
        if !self.publish(
            generation,
            SearchState::Pending {
                location: location.clone(),
            },
        ) {
            return Err(SearchError::Superseded);
        }

        let analysis = tokio::select! {
            () = token.cancelled() => return Err(SearchError::Superseded),
            result = self.analyzer.analyze(&location.address, location.coordinates) => {
                settle_analysis(&location, result)
            }
        };

        if token.is_cancelled() {
            return Err(SearchError::Superseded);
        }

        let mut history = self.history.lock().await;
        let mut completed = location.clone().with_analysis(analysis.clone());
        completed.is_favorite = history.is_favorite(&completed.address);

        if !self.publish(generation, SearchState::Complete { location, analysis }) {
            return Err(SearchError::Superseded);
        }
        history.add_search(completed.clone()).await?;

        tracing::info!(
            address = %completed.address,
            degraded = completed.analysis.as_ref().is_some_and(LocationAnalysis::is_degraded),
            "search complete"
        );
        Ok(completed)
    }

    /// Cancels the running search, if any, without changing the presented
    /// state.
    pub fn cancel_active(&self) {
        let ticket = self.next_ticket();
        let _ = self.begin(ticket);
    }

    /// Shows a stored location, as when picking an entry from history.
    /// Cancels the running search first.
    pub fn select_location(&self, location: &LocationData) {
        let ticket = self.next_ticket();
        if self.begin(ticket).is_some() {
            self.publish(ticket, SearchState::from(location));
        }
    }

    fn next_ticket(&self) -> u64 {
        self.tickets.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Makes `ticket` the holder of the presented state and cancels the
    /// previous holder. Returns `None` if a newer ticket already holds it.
    fn begin(&self, ticket: u64) -> Option<CancellationToken> {
        let mut active = self.active.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
        if active.generation > ticket {
            return None;
        }
        active.token.cancel();
        active.generation = ticket;
        active.token = CancellationToken::new();
        Some(active.token.clone())
    }

    /// Replaces the presented state only if `generation` is still current.
    fn publish(&self, generation: u64, state: SearchState) -> bool {
        let active = self.active.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
        if active.generation != generation || active.token.is_cancelled() {
            return false;
        }
        self.state.send_replace(state);
        true
    }

    /// Wall-clock millis, never less than the previous search's timestamp.
    fn next_timestamp(&self) -> i64 {
        let now = chrono::Utc::now().timestamp_millis();
        let previous = self.last_timestamp.fetch_max(now, Ordering::SeqCst);
        previous.max(now)
    }
}

/// Folds a raised failure and an in-band `error` into the same degraded shape.
fn settle_analysis(
    location: &GeocodedLocation,
    result: Result<LocationAnalysis, AnalyzerError>,
) -> LocationAnalysis {
    match result {
        Ok(analysis) => match analysis.error_message() {
            Some(message) => {
                tracing::warn!(address = %location.address, error = %message, "analysis degraded");
                LocationAnalysis::degraded(&location.address, location.coordinates, message)
            }
            None => analysis,
        },
        Err(e) => {
            tracing::warn!(address = %location.address, error = %e, "analysis degraded");
            LocationAnalysis::degraded(&location.address, location.coordinates, e.to_string())
        }
    }
}

#[cfg(test)]
#[path = "orchestrator_test.rs"]
mod tests;

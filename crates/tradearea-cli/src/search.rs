//! The `search` command: runs one search and prints it as it progresses.

use tradearea_analyzer::AnalyzerClient;
use tradearea_core::{
    miles_to_meters, AppConfig, LocationData, TradeAreaOverlay, Viewport, TRADE_AREA_RADIUS_MILES,
};
use tradearea_geocode::MapboxClient;
use tradearea_search::{HistoryStore, SearchOrchestrator, SearchState};

use crate::overlay::DEFAULT_ZOOM;

/// # Errors
///
/// Returns an error if a provider credential is missing, the history file
/// cannot be read or written, or the search fails (blank input, no match,
/// or a match outside the United States).
pub(crate) async fn run_search(config: &AppConfig, address: &str) -> anyhow::Result<()> {
    let geocoder = MapboxClient::with_base_url(
        config.require_mapbox_token()?,
        config.request_timeout_secs,
        &config.geocoder_base_url,
    )?;
    let analyzer = AnalyzerClient::with_base_url(
        config.require_analyzer_api_key()?,
        &config.analyzer_model,
        config.request_timeout_secs,
        &config.analyzer_base_url,
    )?;
    let history = HistoryStore::open(&config.history_path, config.recent_search_limit).await?;
    let orchestrator = SearchOrchestrator::new(geocoder, analyzer, history);

    let mut states = orchestrator.subscribe();
    let progress = tokio::spawn(async move {
        let mut announced = false;
        while states.changed().await.is_ok() {
            let line = progress_line(&states.borrow_and_update(), announced);
            if let Some(line) = line {
                println!("{line}");
                announced = true;
            }
        }
    });

    let result = orchestrator.search(address).await;
    drop(orchestrator);
    if let Err(e) = progress.await {
        tracing::warn!(error = %e, "progress printer stopped");
    }

    let location = result?;
    print_location(&location);
    Ok(())
}

/// The watch channel only keeps the latest state, so `Pending` can be
/// replaced by `Complete` before the printer wakes. The location is then
/// announced from `Complete` instead.
pub(crate) fn progress_line(state: &SearchState, announced: bool) -> Option<String> {
    match state {
        SearchState::Pending { location } => {
            Some(format!("Found {}, analyzing trade area...", location.address))
        }
        SearchState::Complete { location, .. } if !announced => {
            Some(format!("Found {}", location.address))
        }
        _ => None,
    }
}

fn print_location(location: &LocationData) {
    println!();
    println!("{}", location.address);
    println!("  {}", location.coordinates);
    let overlay = TradeAreaOverlay::new(
        Viewport::new(location.coordinates, DEFAULT_ZOOM, 1024.0, 768.0),
        location.coordinates,
        miles_to_meters(TRADE_AREA_RADIUS_MILES),
    );
    println!(
        "  {TRADE_AREA_RADIUS_MILES} mi trade area: {:.1} px radius at zoom {DEFAULT_ZOOM}",
        overlay.pixel_radius()
    );
    if location.is_favorite {
        println!("  * favorite");
    }

    let Some(analysis) = &location.analysis else {
        return;
    };
    if let Some(message) = analysis.error_message() {
        println!();
        println!("Analysis unavailable: {message}");
        return;
    }

    println!();
    println!("{}", analysis.location.name);
    println!(
        "Area type: {} - {}",
        analysis.rankings.area_type.value, analysis.rankings.area_type.description
    );
    println!(
        "Population: {} - {}",
        analysis.rankings.population.value, analysis.rankings.population.description
    );
    for (heading, body) in analysis.analysis.sections() {
        println!();
        println!("## {heading}");
        println!("{body}");
    }
}

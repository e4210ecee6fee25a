use tradearea_core::{AppConfig, Coordinates};
use tradearea_search::PopulationClient;

/// Queries the configured population endpoint and prints the estimate.
///
/// # Errors
///
/// Returns an error if the endpoint URL is invalid, the endpoint is
/// unreachable, or it answers with an error payload.
pub(crate) async fn run_population(
    config: &AppConfig,
    lat: f64,
    lng: f64,
    radius_miles: f64,
) -> anyhow::Result<()> {
    let client = PopulationClient::new(&config.population_url, config.request_timeout_secs)?;
    let center = Coordinates::new(lng, lat);
    let estimate = client.estimate(center, radius_miles).await?;

    println!(
        "Estimated population within {radius_miles} mi of {center}: {} ({} places)",
        estimate.population, estimate.place_count
    );
    Ok(())
}

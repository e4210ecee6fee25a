mod history;
mod overlay;
mod population;
mod search;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use tradearea_core::TRADE_AREA_RADIUS_MILES;

#[derive(Debug, Parser)]
#[command(name = "tradearea")]
#[command(about = "Trade-area location analysis for US addresses")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Geocode an address, analyze its trade area, and save it to history
    Search {
        /// Street address; multiple words are joined with spaces
        #[arg(required = true, num_args = 1..)]
        address: Vec<String>,
    },
    /// List recent searches, newest first
    History,
    /// List favorited locations
    Favorites,
    /// Toggle the favorite flag on a previously searched address
    Favorite {
        /// Exact formatted address as shown by `history`
        address: String,
    },
    /// Remove every recent search
    ClearHistory,
    /// Remove every favorite
    ClearFavorites,
    /// Ask the population endpoint for an estimate around a point
    Population {
        #[arg(long, allow_hyphen_values = true)]
        lat: f64,
        #[arg(long, allow_hyphen_values = true)]
        lng: f64,
        /// Radius in miles
        #[arg(long, default_value_t = TRADE_AREA_RADIUS_MILES)]
        radius: f64,
    },
    /// Print the on-screen radius of the trade-area circle
    Overlay {
        #[arg(long, allow_hyphen_values = true)]
        lat: f64,
        #[arg(long, allow_hyphen_values = true)]
        lng: f64,
        /// Zoom level; repeat to simulate zoom changes
        #[arg(long, default_values_t = [overlay::DEFAULT_ZOOM])]
        zoom: Vec<f64>,
        /// Viewport width in pixels
        #[arg(long, default_value_t = 1024.0)]
        width: f64,
        /// Viewport height in pixels
        #[arg(long, default_value_t = 768.0)]
        height: f64,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    dotenvy::dotenv().ok();
    let config = tradearea_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Search { address } => search::run_search(&config, &address.join(" ")).await,
        Commands::History => history::run_list_history(&config).await,
        Commands::Favorites => history::run_list_favorites(&config).await,
        Commands::Favorite { address } => history::run_toggle_favorite(&config, &address).await,
        Commands::ClearHistory => history::run_clear_history(&config).await,
        Commands::ClearFavorites => history::run_clear_favorites(&config).await,
        Commands::Population { lat, lng, radius } => {
            population::run_population(&config, lat, lng, radius).await
        }
        Commands::Overlay {
            lat,
            lng,
            zoom,
            width,
            height,
        } => {
            overlay::run_overlay(lat, lng, &zoom, width, height);
            Ok(())
        }
    }
}

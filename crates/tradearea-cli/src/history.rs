//! History and favorites commands. These work on the history file directly
//! and never touch the network.

use chrono::{DateTime, Utc};
use tradearea_core::{AppConfig, LocationData};
use tradearea_search::HistoryStore;

async fn open_store(config: &AppConfig) -> anyhow::Result<HistoryStore> {
    Ok(HistoryStore::open(&config.history_path, config.recent_search_limit).await?)
}

fn fmt_timestamp(millis: i64) -> String {
    DateTime::<Utc>::from_timestamp_millis(millis).map_or_else(
        || "unknown time".to_string(),
        |t| t.format("%Y-%m-%d %H:%M UTC").to_string(),
    )
}

pub(crate) fn format_entry(index: usize, entry: &LocationData) -> String {
    let marker = if entry.is_favorite { " *" } else { "" };
    format!(
        "{:>2}. {}{marker}\n    {}  ({})",
        index + 1,
        entry.address,
        entry.coordinates,
        fmt_timestamp(entry.timestamp)
    )
}

fn print_entries(title: &str, entries: &[LocationData]) {
    if entries.is_empty() {
        println!("No {title}.");
        return;
    }
    println!("{} {title}:", entries.len());
    for (i, entry) in entries.iter().enumerate() {
        println!("{}", format_entry(i, entry));
    }
}

pub(crate) async fn run_list_history(config: &AppConfig) -> anyhow::Result<()> {
    let store = open_store(config).await?;
    print_entries("recent searches", store.recent_searches());
    Ok(())
}

pub(crate) async fn run_list_favorites(config: &AppConfig) -> anyhow::Result<()> {
    let store = open_store(config).await?;
    print_entries("favorites", store.favorites());
    Ok(())
}

pub(crate) async fn run_toggle_favorite(config: &AppConfig, address: &str) -> anyhow::Result<()> {
    let mut store = open_store(config).await?;
    if store.toggle_favorite(address).await? {
        println!("Added to favorites: {address}");
    } else {
        println!("Removed from favorites: {address}");
    }
    Ok(())
}

pub(crate) async fn run_clear_history(config: &AppConfig) -> anyhow::Result<()> {
    open_store(config).await?.clear_history().await?;
    println!("Search history cleared.");
    Ok(())
}

pub(crate) async fn run_clear_favorites(config: &AppConfig) -> anyhow::Result<()> {
    open_store(config).await?.clear_favorites().await?;
    println!("Favorites cleared.");
    Ok(())
}

//! Recent searches and favorites, persisted as one JSON document.
//!
//! The store is an explicit handle: open it once at startup and pass it to
//! whoever needs it. Every mutation is written through to disk before the
//! call returns.

use std::path::{Path, PathBuf};

use tradearea_core::{LocationData, StorageData};

use crate::error::HistoryError;

#[derive(Debug)]
pub struct HistoryStore {
    /// `None` for an in-memory store that never touches disk.
    path: Option<PathBuf>,
    data: StorageData,
    recent_limit: usize,
}

impl HistoryStore {
    /// Opens the history file at `path`.
    ///
    /// A missing or empty file yields empty history. A file that does not
    /// parse is logged and treated as empty; it is overwritten on the next
    /// mutation.
    ///
    /// # Errors
    ///
    /// Returns [`HistoryError::Io`] if the file exists but cannot be read.
    pub async fn open(path: impl Into<PathBuf>, recent_limit: usize) -> Result<Self, HistoryError> {
        let path = path.into();
        let data = match tokio::fs::read_to_string(&path).await {
            Ok(raw) if raw.trim().is_empty() => StorageData::default(),
            Ok(raw) => serde_json::from_str(&raw).unwrap_or_else(|e| {
                tracing::warn!(path = %path.display(), error = %e, "history file unreadable, starting empty");
                StorageData::default()
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => StorageData::default(),
            Err(source) => return Err(HistoryError::Io { path, source }),
        };

        let mut store = Self {
            path: Some(path),
            data,
            recent_limit: recent_limit.max(1),
        };
        store.data.recent_searches.truncate(store.recent_limit);
        Ok(store)
    }

    #[must_use]
    pub fn in_memory(recent_limit: usize) -> Self {
        Self {
            path: None,
            data: StorageData::default(),
            recent_limit: recent_limit.max(1),
        }
    }

    /// Most recent first.
    #[must_use]
    pub fn recent_searches(&self) -> &[LocationData] {
        &self.data.recent_searches
    }

    #[must_use]
    pub fn favorites(&self) -> &[LocationData] {
        &self.data.favorites
    }

    #[must_use]
    pub fn is_favorite(&self, address: &str) -> bool {
        self.data.favorites.iter().any(|f| f.address == address)
    }

    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Records a search at the front of the recent list.
    ///
    /// An existing entry for the same address is replaced rather than
    /// duplicated, and the list is trimmed to the configured limit. If the
    /// address is a favorite, the favorite entry is refreshed with the new
    /// result.
    ///
    /// # Errors
    ///
    /// Returns [`HistoryError`] if the updated history cannot be written.
    pub async fn add_search(&mut self, mut location: LocationData) -> Result<(), HistoryError> {
        location.is_favorite = self.is_favorite(&location.address);

        self.data
            .recent_searches
            .retain(|entry| entry.address != location.address);
        if let Some(favorite) = self
            .data
            .favorites
            .iter_mut()
            .find(|f| f.address == location.address)
        {
            *favorite = location.clone();
        }
        self.data.recent_searches.insert(0, location);
        self.data.recent_searches.truncate(self.recent_limit);

        self.persist().await
    }

    /// Flips the favorite status of `address` and returns the new status.
    ///
    /// Adding requires the address to be in recent searches. The flag is
    /// kept in sync on every stored entry with that address.
    ///
    /// # Errors
    ///
    /// Returns [`HistoryError::UnknownAddress`] when adding an address that
    /// is neither a favorite nor a recent search, or [`HistoryError`] if the
    /// write fails.
    pub async fn toggle_favorite(&mut self, address: &str) -> Result<bool, HistoryError> {
        let now_favorite = if self.is_favorite(address) {
            self.data.favorites.retain(|f| f.address != address);
            false
        } else {
            let mut entry = self
                .data
                .recent_searches
                .iter()
                .find(|r| r.address == address)
                .cloned()
                .ok_or_else(|| HistoryError::UnknownAddress(address.to_owned()))?;
            entry.is_favorite = true;
            self.data.favorites.insert(0, entry);
            true
        };

        for entry in self
            .data
            .recent_searches
            .iter_mut()
            .filter(|r| r.address == address)
        {
            entry.is_favorite = now_favorite;
        }

        tracing::info!(%address, favorite = now_favorite, "favorite toggled");
        self.persist().await?;
        Ok(now_favorite)
    }

    /// # Errors
    ///
    /// Returns [`HistoryError`] if the write fails.
    pub async fn clear_history(&mut self) -> Result<(), HistoryError> {
        self.data.recent_searches.clear();
        self.persist().await
    }

    /// Removes every favorite and clears the flag on recent searches.
    ///
    /// # Errors
    ///
    /// Returns [`HistoryError`] if the write fails.
    pub async fn clear_favorites(&mut self) -> Result<(), HistoryError> {
        self.data.favorites.clear();
        for entry in &mut self.data.recent_searches {
            entry.is_favorite = false;
        }
        self.persist().await
    }

    /// Writes to a sibling temp file, then renames over the target.
    async fn persist(&self) -> Result<(), HistoryError> {
        let Some(path) = &self.path else {
            return Ok(());
        };

        let io_err = |source| HistoryError::Io {
            path: path.clone(),
            source,
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await.map_err(io_err)?;
        }

        let encoded = serde_json::to_vec_pretty(&self.data)?;
        let tmp = path.with_extension("json.tmp");
        tokio::fs::write(&tmp, encoded).await.map_err(io_err)?;
        tokio::fs::rename(&tmp, path).await.map_err(io_err)?;
        Ok(())
    }
}

#[cfg(test)]
#[path = "history_test.rs"]
mod tests;

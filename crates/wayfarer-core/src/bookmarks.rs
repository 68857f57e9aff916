//! Bookmark list over the config store

use wayfarer_storage::{ConfigStore, Result};

/// Insertion-ordered, duplicate-free list of bookmarked URLs
pub struct BookmarkManager {
    store: ConfigStore,
}

impl BookmarkManager {
    pub fn new(store: ConfigStore) -> Self {
        Self { store }
    }

    /// Append `url` unless it is already bookmarked. Returns whether it was added.
    pub fn add(&self, url: &str) -> Result<bool> {
        if self.contains(url) {
            return Ok(false);
        }

        self.store
            .update(|config| config.bookmarks.push(url.to_string()))?;

        tracing::info!(url = %url, "Added bookmark");
        Ok(true)
    }

    /// Remove `url` if present. The document is saved either way.
    pub fn remove(&self, url: &str) -> Result<bool> {
        let removed = self.store.update(|config| {
            let before = config.bookmarks.len();
            config.bookmarks.retain(|b| b != url);
            config.bookmarks.len() != before
        })?;

        if removed {
            tracing::info!(url = %url, "Removed bookmark");
        }
        Ok(removed)
    }

    pub fn contains(&self, url: &str) -> bool {
        self.store
            .read(|config| config.bookmarks.iter().any(|b| b == url))
    }

    pub fn list(&self) -> Vec<String> {
        self.store.read(|config| config.bookmarks.clone())
    }
}

impl Clone for BookmarkManager {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
        }
    }
}

//! History management

use chrono::Local;

use crate::error::NavigationError;
use crate::Result;
use wayfarer_storage::{ConfigStore, HistoryEntry};

pub struct HistoryManager {
    store: ConfigStore,
}

impl HistoryManager {
    pub fn new(store: ConfigStore) -> Self {
        Self { store }
    }

    /// Append a completed load, stamped with the local wall-clock time.
    ///
    /// Entries are never deduplicated.
    pub fn record_visit(&self, url: &str) -> Result<HistoryEntry> {
        let entry = HistoryEntry::new(url, Local::now().format("%H:%M:%S").to_string());

        self.store
            .update(|config| config.history.push(entry.clone()))?;

        tracing::debug!(url = %url, time = %entry.time, "Recorded visit");

        Ok(entry)
    }

    /// All entries in load-completion order
    pub fn list(&self) -> Vec<HistoryEntry> {
        self.store.read(|config| config.history.clone())
    }

    pub fn get(&self, index: usize) -> Result<HistoryEntry> {
        self.store
            .read(|config| config.history.get(index).cloned())
            .ok_or(NavigationError::NoSuchEntry(index))
    }

    /// Clear all history
    pub fn clear_all(&self) -> Result<()> {
        self.store.update(|config| config.history.clear())?;
        tracing::info!("Cleared history");
        Ok(())
    }
}

impl Clone for HistoryManager {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
        }
    }
}

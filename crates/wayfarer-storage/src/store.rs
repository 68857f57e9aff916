//! Config file handle

use parking_lot::RwLock;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::error::StorageError;
use crate::schema::Config;
use crate::Result;

/// Shared handle to the in-memory config and the file backing it.
///
/// Clones share the same document. Mutations go through [`ConfigStore::update`],
/// which writes the whole document back to disk before returning.
pub struct ConfigStore {
    path: Arc<PathBuf>,
    config: Arc<RwLock<Config>>,
}

impl ConfigStore {
    /// Open the store at `path`, reading whatever is on disk.
    pub fn open<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref().to_path_buf();
        let config = Self::read_file(&path);

        Self {
            path: Arc::new(path),
            config: Arc::new(RwLock::new(config)),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Re-read the file, replacing the in-memory document.
    ///
    /// A missing or unreadable file yields the default config.
    pub fn load(&self) -> Config {
        let config = Self::read_file(&self.path);
        *self.config.write() = config.clone();
        config
    }

    /// Overwrite the file with `config` and make it the in-memory document.
    pub fn save(&self, config: &Config) -> Result<()> {
        *self.config.write() = config.clone();
        self.write_file(config)
    }

    /// Snapshot of the current document
    pub fn snapshot(&self) -> Config {
        self.config.read().clone()
    }

    pub fn read<F, T>(&self, f: F) -> T
    where
        F: FnOnce(&Config) -> T,
    {
        let guard = self.config.read();
        f(&guard)
    }

    /// Apply `f` and persist the full document.
    ///
    /// The in-memory change is kept even when the write fails.
    pub fn update<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&mut Config) -> T,
    {
        let (value, snapshot) = {
            let mut guard = self.config.write();
            let value = f(&mut guard);
            (value, guard.clone())
        };

        self.write_file(&snapshot)?;
        Ok(value)
    }

    fn read_file(path: &Path) -> Config {
        let raw = match std::fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "No config file, using defaults");
                return Config::default();
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Cannot read config, using defaults");
                return Config::default();
            }
        };

        match serde_json::from_str(&raw) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Corrupt config, using defaults");
                Config::default()
            }
        }
    }

    fn write_file(&self, config: &Config) -> Result<()> {
        let json = serde_json::to_string_pretty(config)?;

        let io_result = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => std::fs::create_dir_all(parent),
            _ => Ok(()),
        }
        .and_then(|_| std::fs::write(self.path.as_ref(), json));

        io_result.map_err(|source| StorageError::Save {
            path: self.path.as_ref().clone(),
            source,
        })?;

        tracing::trace!(path = %self.path.display(), "Saved config");
        Ok(())
    }
}

impl Clone for ConfigStore {
    fn clone(&self) -> Self {
        Self {
            path: Arc::clone(&self.path),
            config: Arc::clone(&self.config),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{HistoryEntry, Theme};

    fn sample_config() -> Config {
        Config {
            home: "https://home.test".to_string(),
            theme: Theme::Solarized,
            history: vec![
                HistoryEntry::new("https://a.test", "08:00:01"),
                HistoryEntry::new("https://a.test", "08:00:02"),
            ],
            bookmarks: vec!["https://b.test".to_string(), "https://c.test".to_string()],
            browser_type: "headless".to_string(),
        }
    }

    #[test]
    fn test_save_then_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = ConfigStore::open(dir.path().join("config.json"));

        let config = sample_config();
        store.save(&config).unwrap();

        let reopened = ConfigStore::open(store.path());
        assert_eq!(reopened.load(), config);
        assert_eq!(reopened.snapshot(), config);
    }

    #[test]
    fn test_saved_file_is_pretty_json() {
        let dir = tempfile::tempdir().unwrap();
        let store = ConfigStore::open(dir.path().join("config.json"));
        store.save(&sample_config()).unwrap();

        let raw = std::fs::read_to_string(store.path()).unwrap();
        assert!(raw.contains('\n'));
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(value["theme"], "solarized");
        assert_eq!(value["browser_type"], "headless");
        assert_eq!(value["history"][1]["time"], "08:00:02");
    }

    #[test]
    fn test_missing_file_loads_default() {
        let dir = tempfile::tempdir().unwrap();
        let store = ConfigStore::open(dir.path().join("absent.json"));
        assert_eq!(store.load(), Config::default());
    }

    #[test]
    fn test_corrupt_file_loads_default() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{ not json").unwrap();

        let store = ConfigStore::open(&path);
        assert_eq!(store.snapshot(), Config::default());
        assert_eq!(store.load(), Config::default());
    }

    #[test]
    fn test_duplicate_bookmarks_are_not_saved_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"bookmarks": ["https://a.test", "https://a.test"]}"#).unwrap();

        let store = ConfigStore::open(&path);
        store
            .update(|config| config.bookmarks.push("https://b.test".to_string()))
            .unwrap();

        let reopened = ConfigStore::open(&path);
        assert_eq!(
            reopened.snapshot().bookmarks,
            vec!["https://a.test", "https://b.test"]
        );
        let raw = std::fs::read_to_string(&path).unwrap();
        assert_eq!(raw.matches("https://a.test").count(), 1);
    }

    #[test]
    fn test_update_writes_through() {
        let dir = tempfile::tempdir().unwrap();
        let store = ConfigStore::open(dir.path().join("nested").join("config.json"));

        store
            .update(|config| config.bookmarks.push("https://a.test".to_string()))
            .unwrap();

        let reopened = ConfigStore::open(store.path());
        assert_eq!(reopened.snapshot().bookmarks, vec!["https://a.test"]);
    }

    #[test]
    fn test_failed_write_keeps_memory_state() {
        let dir = tempfile::tempdir().unwrap();
        // A directory in place of the file makes the write fail.
        let path = dir.path().join("config.json");
        std::fs::create_dir(&path).unwrap();

        let store = ConfigStore::open(&path);
        let result = store.update(|config| config.theme = Theme::Dark);

        assert!(matches!(result, Err(StorageError::Save { .. })));
        assert_eq!(store.snapshot().theme, Theme::Dark);
    }

    #[test]
    fn test_clones_share_document() {
        let dir = tempfile::tempdir().unwrap();
        let store = ConfigStore::open(dir.path().join("config.json"));
        let other = store.clone();

        store.update(|config| config.home = "https://x.test".to_string()).unwrap();
        assert_eq!(other.read(|config| config.home.clone()), "https://x.test");
    }
}

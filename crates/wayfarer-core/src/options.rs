//! Process-level options

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use wayfarer_archive::DEFAULT_ENDPOINT;

pub const CONFIG_ENV: &str = "WAYFARER_CONFIG";
pub const ARCHIVE_ENDPOINT_ENV: &str = "WAYFARER_ARCHIVE_ENDPOINT";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrowserOptions {
    /// Path to the JSON config document
    pub config_path: PathBuf,
    /// Where downloads land when no destination is given
    pub download_dir: PathBuf,
    /// Archive availability API
    pub archive_endpoint: String,
}

impl BrowserOptions {
    pub fn new(data_dir: PathBuf) -> Self {
        let download_dir = dirs::download_dir()
            .or_else(|| dirs::home_dir().map(|h| h.join("Downloads")))
            .unwrap_or_else(|| data_dir.join("Downloads"));

        Self {
            config_path: data_dir.join("config.json"),
            download_dir,
            archive_endpoint: DEFAULT_ENDPOINT.to_string(),
        }
    }

    pub fn data_dir() -> PathBuf {
        dirs::data_dir()
            .map(|d| d.join("Wayfarer"))
            .unwrap_or_else(|| PathBuf::from(".wayfarer"))
    }

    /// Defaults, overridden by `WAYFARER_CONFIG` / `WAYFARER_ARCHIVE_ENDPOINT`
    pub fn from_env() -> Self {
        let mut options = Self::default();

        if let Some(path) = std::env::var_os(CONFIG_ENV).filter(|v| !v.is_empty()) {
            options.config_path = PathBuf::from(path);
        }

        if let Ok(endpoint) = std::env::var(ARCHIVE_ENDPOINT_ENV) {
            if !endpoint.trim().is_empty() {
                options.archive_endpoint = endpoint.trim().to_string();
            }
        }

        options
    }
}

impl Default for BrowserOptions {
    fn default() -> Self {
        Self::new(Self::data_dir())
    }
}

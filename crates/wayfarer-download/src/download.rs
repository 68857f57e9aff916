//! Download data structure

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::PathBuf;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DownloadState {
    Downloading,
    Completed,
}

impl DownloadState {
    pub fn as_str(&self) -> &'static str {
        match self {
            DownloadState::Downloading => "downloading",
            DownloadState::Completed => "completed",
        }
    }
}

impl std::fmt::Display for DownloadState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Download {
    pub id: String,
    pub url: String,
    pub file_path: PathBuf,
    pub mime_type: Option<String>,
    pub total_bytes: Option<u64>,
    pub downloaded_bytes: u64,
    pub state: DownloadState,
    /// Hex SHA-256 of the written file
    pub hash: Option<String>,
    pub created_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl Download {
    pub fn new(url: String, file_path: PathBuf) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            url,
            file_path,
            mime_type: None,
            total_bytes: None,
            downloaded_bytes: 0,
            state: DownloadState::Downloading,
            hash: None,
            created_at: Utc::now(),
            completed_at: None,
        }
    }

    /// Record the response metadata once headers arrive
    pub fn start(&mut self, mime_type: Option<String>, total_bytes: Option<u64>) {
        self.mime_type = mime_type;
        self.total_bytes = total_bytes;
    }

    pub fn complete(&mut self, hash: String) {
        self.hash = Some(hash);
        self.state = DownloadState::Completed;
        self.completed_at = Some(Utc::now());
    }
}

/// File name from the last URL path segment, or `download`
pub fn best_effort_file_name(url: &str) -> String {
    if let Ok(parsed) = url::Url::parse(url) {
        if let Some(name) = parsed
            .path_segments()
            .and_then(|mut s| s.next_back())
            .map(str::trim)
            .filter(|s| !s.is_empty())
        {
            return name.to_string();
        }
    }
    "download".to_string()
}

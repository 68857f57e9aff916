//! Core error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Storage error: {0}")]
    Storage(#[from] wayfarer_storage::StorageError),

    #[error("Tab error: {0}")]
    Tab(#[from] wayfarer_tabs::TabError),

    #[error("Session error: {0}")]
    Session(#[from] wayfarer_session::SessionError),

    #[error("Navigation error: {0}")]
    Navigation(#[from] wayfarer_navigation::NavigationError),

    #[error("Download error: {0}")]
    Download(#[from] wayfarer_download::DownloadError),

    #[error("Snapshot error: {0}")]
    Lookup(#[from] wayfarer_archive::LookupError),

    #[error("Unsupported browser type: {0}")]
    UnsupportedBrowserType(String),
}

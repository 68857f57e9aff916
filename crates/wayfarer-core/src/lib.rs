//! Wayfarer Core
//!
//! Central coordination layer: the [`Browser`] context object that the shell
//! drives, plus process-level options and logging setup.

mod bookmarks;
mod browser;
mod error;
mod notice;
mod options;
mod registry;

#[cfg(test)]
mod testing;

pub use bookmarks::BookmarkManager;
pub use browser::{Browser, HELP_TEXT};
pub use error::CoreError;
pub use notice::{Notice, NoticeLevel};
pub use options::{BrowserOptions, ARCHIVE_ENDPOINT_ENV, CONFIG_ENV};
pub use registry::EngineRegistry;

// Re-export core components
pub use wayfarer_archive::{ArchivedSnapshot, LookupError, SnapshotClient};
pub use wayfarer_devtools::{DevConsole, HIGHLIGHT_FUNCTION};
pub use wayfarer_download::{Download, DownloadError, DownloadState};
pub use wayfarer_navigation::{normalize_url, NavigationError};
pub use wayfarer_session::SessionError;
pub use wayfarer_storage::{
    Config, ConfigStore, HistoryEntry, StorageError, Theme, ThemePalette, DEFAULT_BROWSER_TYPE,
};
pub use wayfarer_tabs::{
    engine_channel, EngineContext, EngineError, EngineEvent, EngineEventReceiver,
    EngineEventSender, EngineFactory, RequestInterceptor, RequestLog, ScriptRequest, ScriptTicket, Tab,
    TabError, TabId, WebEngine,
};

pub type Result<T> = std::result::Result<T, CoreError>;

/// Initialize logging
pub fn init_logging() {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    // stdout belongs to the command shell
    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
}

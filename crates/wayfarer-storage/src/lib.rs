//! Wayfarer Storage Layer
//!
//! JSON document persistence for user settings, history and bookmarks.
//! Every mutation is written through to disk immediately.

mod error;
mod schema;
mod store;

pub use error::StorageError;
pub use schema::{Config, HistoryEntry, Theme, ThemePalette, DEFAULT_BROWSER_TYPE, DEFAULT_HOME};
pub use store::ConfigStore;

pub type Result<T> = std::result::Result<T, StorageError>;

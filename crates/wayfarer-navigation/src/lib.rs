//! Wayfarer Navigation
//!
//! - Address bar input: anything without a recognized scheme gets `https://`
//! - Local files open through `file://` URLs
//! - Every completed page load is appended to the history

mod error;
mod history;
mod input;

pub use error::NavigationError;
pub use history::HistoryManager;
pub use input::{file_url, has_known_scheme, normalize_url};

pub type Result<T> = std::result::Result<T, NavigationError>;

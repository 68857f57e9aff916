//! Lookup error types

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LookupError {
    /// The archive answered but holds no snapshot for the URL
    #[error("No past snapshot found")]
    NotFound,

    /// Transport, status or body failure
    #[error("Snapshot lookup failed: {0}")]
    LookupFailed(String),
}

impl From<reqwest::Error> for LookupError {
    fn from(e: reqwest::Error) -> Self {
        LookupError::LookupFailed(e.to_string())
    }
}

impl From<serde_json::Error> for LookupError {
    fn from(e: serde_json::Error) -> Self {
        LookupError::LookupFailed(e.to_string())
    }
}

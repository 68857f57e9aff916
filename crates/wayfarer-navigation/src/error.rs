//! Navigation error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum NavigationError {
    #[error("Cannot open file {path}: {reason}")]
    InvalidPath { path: String, reason: String },

    #[error("History entry {0} does not exist")]
    NoSuchEntry(usize),

    #[error("Storage error: {0}")]
    Storage(#[from] wayfarer_storage::StorageError),
}

//! Session error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SessionError {
    #[error("Tab error: {0}")]
    Tab(#[from] wayfarer_tabs::TabError),

    #[error("No active tab")]
    NoActiveTab,
}

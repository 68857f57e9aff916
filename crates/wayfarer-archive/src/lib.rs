//! Wayfarer Snapshot Lookup
//!
//! Asks a web archive's availability API for the closest archived copy of
//! a page.

mod client;
mod error;

pub use client::{parse_availability, ArchivedSnapshot, SnapshotClient, DEFAULT_ENDPOINT};
pub use error::LookupError;

pub type Result<T> = std::result::Result<T, LookupError>;

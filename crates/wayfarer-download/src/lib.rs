//! Wayfarer Downloads
//!
//! A download is a single streamed GET written straight to a user-chosen
//! path. No pause, resume or retry.

mod download;
mod downloader;
mod error;

pub use download::{best_effort_file_name, Download, DownloadState};
pub use downloader::Downloader;
pub use error::DownloadError;

pub type Result<T> = std::result::Result<T, DownloadError>;

//! Application state management
use parking_lot::Mutex;
use std::path::PathBuf;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

use wayfarer_core::{ArchivedSnapshot, Browser, Download, DownloadError, LookupError, Result};

/// Result of background work, applied back on the shell loop
#[derive(Debug)]
pub enum TaskOutcome {
    Snapshot(std::result::Result<ArchivedSnapshot, LookupError>),
    Download(std::result::Result<Download, DownloadError>),
}

/// Browser plus the channel background tasks report into
pub struct AppState {
    browser: Mutex<Browser>,
    outcomes: UnboundedSender<TaskOutcome>,
}

impl AppState {
    pub fn new(browser: Browser) -> (Self, UnboundedReceiver<TaskOutcome>) {
        let (outcomes, rx) = mpsc::unbounded_channel();
        let state = Self {
            browser: Mutex::new(browser),
            outcomes,
        };
        (state, rx)
    }

    pub fn with_browser<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&mut Browser) -> Result<T>,
    {
        let mut guard = self.browser.lock();
        f(&mut guard)
    }

    /// Start a snapshot lookup; the outcome arrives on the task channel.
    ///
    /// Must be called from within the tokio runtime.
    pub fn spawn_lookup(&self, url: &str) {
        let lookup = self.browser.lock().lookup_snapshot(url);
        let outcomes = self.outcomes.clone();

        tokio::spawn(async move {
            let _ = outcomes.send(TaskOutcome::Snapshot(lookup.await));
        });
    }

    pub fn spawn_download(&self, url: &str, destination: Option<PathBuf>) {
        let fetch = self.browser.lock().download(url, destination);
        let outcomes = self.outcomes.clone();

        tokio::spawn(async move {
            let _ = outcomes.send(TaskOutcome::Download(fetch.await));
        });
    }

    pub fn apply(&self, outcome: TaskOutcome) {
        let mut browser = self.browser.lock();
        match outcome {
            TaskOutcome::Snapshot(result) => {
                browser.open_snapshot(result);
            }
            TaskOutcome::Download(result) => browser.finish_download(result),
        }
    }
}

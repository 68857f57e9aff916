//! Download commands
use std::path::PathBuf;

use super::tabs::CommandResult;
use crate::state::AppState;

/// Start fetching `url` in the background. Completion is reported as a notice.
pub fn start_download(state: &AppState, url: &str, destination: Option<&str>) -> CommandResult<String> {
    let url = url.trim();
    if url.is_empty() {
        return CommandResult::err("Usage: download <url> [destination]".to_string());
    }

    let destination = destination
        .map(str::trim)
        .filter(|d| !d.is_empty())
        .map(PathBuf::from);

    tracing::info!(url = %url, "Download started");
    state.spawn_download(url, destination);
    CommandResult::ok(url.to_string())
}

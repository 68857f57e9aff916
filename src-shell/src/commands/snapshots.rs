//! Archived snapshot lookup
use super::tabs::CommandResult;
use crate::state::AppState;

/// Look up `url`, or the active tab's page. Returns the URL looked up; the
/// snapshot opens in a new tab once the archive answers.
pub fn view_snapshot(state: &AppState, url: Option<&str>) -> CommandResult<String> {
    let url = match url.map(str::trim).filter(|u| !u.is_empty()) {
        Some(url) => url.to_string(),
        None => match state.with_browser(|browser| Ok(browser.active_tab()?.url().to_string())) {
            Ok(url) => url,
            Err(e) => return CommandResult::err(e.to_string()),
        },
    };

    tracing::info!(url = %url, "Snapshot lookup started");
    state.spawn_lookup(&url);
    CommandResult::ok(url)
}

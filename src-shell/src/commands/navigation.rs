//! Navigation and history commands
use super::tabs::CommandResult;
use crate::state::AppState;

/// Load address-bar input in the active tab; returns the normalized URL
pub fn navigate(state: &AppState, input: &str) -> CommandResult<String> {
    state.with_browser(|browser| browser.navigate(input)).into()
}

pub fn go_back(state: &AppState) -> CommandResult<()> {
    state.with_browser(|browser| browser.back()).into()
}

pub fn go_forward(state: &AppState) -> CommandResult<()> {
    state.with_browser(|browser| browser.forward()).into()
}

pub fn reload(state: &AppState) -> CommandResult<()> {
    state.with_browser(|browser| browser.reload()).into()
}

pub fn go_home(state: &AppState) -> CommandResult<String> {
    state.with_browser(|browser| browser.navigate_home()).into()
}

pub fn list_history(state: &AppState) -> CommandResult<Vec<String>> {
    state.with_browser(|browser| Ok(browser.list_history())).into()
}

pub fn open_history_entry(state: &AppState, index: &str) -> CommandResult<String> {
    let Ok(index) = index.trim().parse::<usize>() else {
        return CommandResult::err(format!("Not a history index: {}", index));
    };

    state
        .with_browser(|browser| browser.open_history_entry(index))
        .into()
}

pub fn clear_history(state: &AppState) -> CommandResult<()> {
    state
        .with_browser(|browser| {
            browser.clear_history();
            Ok(())
        })
        .into()
}

//! Settings and bookmark commands
use serde::Serialize;

use wayfarer_core::{Browser, Theme, ThemePalette};

use super::tabs::CommandResult;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct SettingsInfo {
    pub home: String,
    pub theme: Theme,
    /// `None` keeps the platform look
    pub palette: Option<ThemePalette>,
    pub browser_type: String,
    pub browser_types: Vec<String>,
}

impl SettingsInfo {
    fn from_browser(browser: &Browser) -> Self {
        let theme = browser.theme();
        Self {
            home: browser.home(),
            theme,
            palette: theme.palette(),
            browser_type: browser.browser_type(),
            browser_types: browser
                .browser_types()
                .into_iter()
                .map(str::to_string)
                .collect(),
        }
    }
}

pub fn get_settings(state: &AppState) -> CommandResult<SettingsInfo> {
    state
        .with_browser(|browser| Ok(SettingsInfo::from_browser(browser)))
        .into()
}

pub fn set_theme(state: &AppState, name: &str) -> CommandResult<SettingsInfo> {
    let theme = match name.parse::<Theme>() {
        Ok(theme) => theme,
        Err(e) => return CommandResult::err(e),
    };

    state
        .with_browser(|browser| {
            browser.set_theme(theme);
            Ok(SettingsInfo::from_browser(browser))
        })
        .into()
}

pub fn set_home(state: &AppState, input: &str) -> CommandResult<String> {
    state.with_browser(|browser| Ok(browser.set_home(input))).into()
}

pub fn set_browser_type(state: &AppState, kind: &str) -> CommandResult<SettingsInfo> {
    state
        .with_browser(|browser| {
            browser.set_browser_type(kind.trim())?;
            Ok(SettingsInfo::from_browser(browser))
        })
        .into()
}

pub fn list_bookmarks(state: &AppState) -> CommandResult<Vec<String>> {
    state.with_browser(|browser| Ok(browser.list_bookmarks())).into()
}

/// Bookmark `url`, or the active tab's page; false when already present
pub fn add_bookmark(state: &AppState, url: Option<&str>) -> CommandResult<bool> {
    state
        .with_browser(|browser| match url {
            Some(url) => Ok(browser.add_bookmark(url.trim())),
            None => browser.bookmark_current_page(),
        })
        .into()
}

pub fn remove_bookmark(state: &AppState, url: &str) -> CommandResult<bool> {
    state
        .with_browser(|browser| Ok(browser.remove_bookmark(url.trim())))
        .into()
}

pub fn open_bookmark(state: &AppState, url: &str) -> CommandResult<String> {
    state
        .with_browser(|browser| browser.open_bookmark(url.trim()))
        .into()
}

//! Tab management commands
use serde::Serialize;

use wayfarer_core::{Browser, Tab, TabId};

use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct TabInfo {
    pub id: String,
    pub index: usize,
    pub url: String,
    pub title: String,
    pub active: bool,
}

impl TabInfo {
    fn new(index: usize, tab: &Tab, active: bool) -> Self {
        Self {
            id: tab.id().to_string(),
            index,
            url: tab.url().to_string(),
            title: tab.display_title().to_string(),
            active,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CommandResult<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<String>,
}

impl<T> CommandResult<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn err(error: String) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error),
        }
    }
}

impl<T> From<wayfarer_core::Result<T>> for CommandResult<T> {
    fn from(result: wayfarer_core::Result<T>) -> Self {
        match result {
            Ok(data) => Self::ok(data),
            Err(e) => Self::err(e.to_string()),
        }
    }
}

/// Tab by strip index or id
pub fn resolve_tab(browser: &Browser, target: &str) -> Option<TabId> {
    let target = target.trim();

    if let Ok(index) = target.parse::<usize>() {
        return browser.tabs().get(index).map(|tab| tab.id());
    }

    let id = target.parse::<TabId>().ok()?;
    browser.tabs().iter().any(|tab| tab.id() == id).then_some(id)
}

pub fn describe_tab(browser: &Browser, tab_id: TabId) -> Option<TabInfo> {
    let active = browser.active_tab_id();
    browser
        .tabs()
        .iter()
        .enumerate()
        .find(|(_, tab)| tab.id() == tab_id)
        .map(|(index, tab)| TabInfo::new(index, tab, active == Some(tab_id)))
}

pub fn list_tabs(state: &AppState) -> CommandResult<Vec<TabInfo>> {
    state
        .with_browser(|browser| {
            let active = browser.active_tab_id();
            Ok(browser
                .tabs()
                .iter()
                .enumerate()
                .map(|(index, tab)| TabInfo::new(index, tab, active == Some(tab.id())))
                .collect())
        })
        .into()
}

pub fn create_tab(state: &AppState, url: Option<&str>) -> CommandResult<TabInfo> {
    opened(state.with_browser(|browser| {
        let tab_id = browser.open_tab(url)?;
        Ok(describe_tab(browser, tab_id))
    }))
}

/// Close `target`, or the active tab. The last tab stays open.
pub fn close_tab(state: &AppState, target: Option<&str>) -> CommandResult<bool> {
    let tab_id = match target {
        Some(target) => state.with_browser(|browser| Ok(resolve_tab(browser, target))),
        None => state.with_browser(|browser| Ok(browser.active_tab_id())),
    };

    match tab_id {
        Ok(Some(tab_id)) => state.with_browser(|browser| browser.close_tab(tab_id)).into(),
        Ok(None) => CommandResult::err(format!("No such tab: {}", target.unwrap_or_default())),
        Err(e) => CommandResult::err(e.to_string()),
    }
}

pub fn activate_tab(state: &AppState, target: &str) -> CommandResult<TabInfo> {
    let tab_id = match state.with_browser(|browser| Ok(resolve_tab(browser, target))) {
        Ok(Some(tab_id)) => tab_id,
        Ok(None) => return CommandResult::err(format!("No such tab: {}", target)),
        Err(e) => return CommandResult::err(e.to_string()),
    };

    opened(state.with_browser(|browser| {
        browser.activate_tab(tab_id)?;
        Ok(describe_tab(browser, tab_id))
    }))
}

/// Open a local HTML file in a new tab
pub fn open_file(state: &AppState, path: &str) -> CommandResult<TabInfo> {
    opened(state.with_browser(|browser| {
        let tab_id = browser.open_local_file(path.trim())?;
        Ok(describe_tab(browser, tab_id))
    }))
}

fn opened(result: wayfarer_core::Result<Option<TabInfo>>) -> CommandResult<TabInfo> {
    match result {
        Ok(Some(info)) => CommandResult::ok(info),
        Ok(None) => CommandResult::err("Tab vanished".to_string()),
        Err(e) => CommandResult::err(e.to_string()),
    }
}

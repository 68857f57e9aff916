//! Developer console commands
//!
//! Script results arrive later as engine events; `console` shows the
//! transcript as it stands.
use serde::Serialize;

use wayfarer_core::{DevConsole, ScriptTicket};

use super::tabs::CommandResult;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct ConsoleInfo {
    pub transcript: Vec<String>,
    pub dom_output: Vec<String>,
    pub inputs: Vec<String>,
    /// Evaluations still waiting for a result
    pub outstanding: usize,
}

impl From<&DevConsole> for ConsoleInfo {
    fn from(console: &DevConsole) -> Self {
        Self {
            transcript: console.transcript().to_vec(),
            dom_output: console.dom_output().to_vec(),
            inputs: console.inputs().to_vec(),
            outstanding: console.outstanding(),
        }
    }
}

/// Evaluate JavaScript in the active tab
pub fn run_script(state: &AppState, code: &str) -> CommandResult<Option<ScriptTicket>> {
    state.with_browser(|browser| browser.run_script(code)).into()
}

pub fn highlight_selector(state: &AppState, selector: &str) -> CommandResult<Option<ScriptTicket>> {
    state
        .with_browser(|browser| browser.highlight_selector(selector))
        .into()
}

pub fn get_console(state: &AppState) -> CommandResult<ConsoleInfo> {
    match state.with_browser(|browser| Ok(browser.active_console().map(ConsoleInfo::from))) {
        Ok(Some(info)) => CommandResult::ok(info),
        Ok(None) => CommandResult::err("No active tab".to_string()),
        Err(e) => CommandResult::err(e.to_string()),
    }
}

/// Network requests issued by the active tab, oldest first
pub fn list_requests(state: &AppState) -> CommandResult<Vec<String>> {
    state.with_browser(|browser| browser.list_requests()).into()
}

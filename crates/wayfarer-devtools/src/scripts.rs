//! Scripts the console sends to the page, and how their results are shown

use serde_json::{json, Value};

use wayfarer_tabs::ScriptRequest;

/// Outlines every element matching the bound `selector` argument and
/// returns their outer HTML. An invalid selector yields `null`.
pub const HIGHLIGHT_FUNCTION: &str = "(selector) => {
    try {
        const els = document.querySelectorAll(selector);
        els.forEach(e => e.style.outline = '3px solid red');
        return Array.from(els).map(e => e.outerHTML);
    } catch (e) {
        return null;
    }
}";

/// Selector text only ever travels as an argument value.
pub fn highlight_request(selector: &str) -> ScriptRequest {
    ScriptRequest::call(HIGHLIGHT_FUNCTION, vec![json!(selector)])
}

/// Script transcript line for an evaluation result
pub fn render_script_result(value: &Value) -> String {
    match value {
        Value::String(s) => format!("<< {}", s),
        other => format!("<< {}", other),
    }
}

/// DOM transcript lines for a highlight result
pub fn render_dom_result(value: &Value) -> Vec<String> {
    match value {
        Value::Null => Vec::new(),
        Value::Array(items) => items.iter().map(scalar_text).collect(),
        other => vec![scalar_text(other)],
    }
}

fn scalar_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

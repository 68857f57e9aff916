//! Per-tab developer console

use serde_json::Value;

use wayfarer_tabs::{ScriptRequest, ScriptTicket};

use crate::ordering::ReorderBuffer;
use crate::scripts::{highlight_request, render_dom_result, render_script_result};

#[derive(Debug, Default)]
pub struct DevConsole {
    /// `>>> input` / `<< result` lines
    transcript: Vec<String>,
    /// Outer HTML of highlighted elements, one per line
    dom_output: Vec<String>,
    /// Every script submitted, in submission order
    inputs: Vec<String>,
    next_ticket: u64,
    scripts: ReorderBuffer<Value>,
    queries: ReorderBuffer<Value>,
}

impl DevConsole {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue `code` for evaluation. The input is echoed immediately; the
    /// returned request must be handed to the tab's engine with the ticket.
    pub fn run_script(&mut self, code: &str) -> Option<(ScriptTicket, ScriptRequest)> {
        if code.trim().is_empty() {
            return None;
        }

        let ticket = self.issue_ticket();
        self.scripts.expect(ticket);
        self.inputs.push(code.to_string());
        self.transcript.push(format!(">>> {}", code));

        Some((ticket, ScriptRequest::expression(code)))
    }

    /// Queue a highlight of every element matching `selector`
    pub fn highlight_selector(&mut self, selector: &str) -> Option<(ScriptTicket, ScriptRequest)> {
        let selector = selector.trim();
        if selector.is_empty() {
            return None;
        }

        let ticket = self.issue_ticket();
        self.queries.expect(ticket);

        Some((ticket, highlight_request(selector)))
    }

    /// Deliver an engine result. Returns false if the ticket is not one this
    /// console is waiting on.
    pub fn complete(&mut self, ticket: ScriptTicket, value: Value) -> bool {
        if self.scripts.is_pending(ticket) {
            if let Some(released) = self.scripts.complete(ticket, value) {
                self.transcript
                    .extend(released.iter().map(render_script_result));
            }
            return true;
        }

        if self.queries.is_pending(ticket) {
            if let Some(released) = self.queries.complete(ticket, value) {
                for result in &released {
                    self.dom_output.extend(render_dom_result(result));
                }
            }
            return true;
        }

        tracing::debug!(ticket = %ticket, "Ignoring result for unknown ticket");
        false
    }

    pub fn transcript(&self) -> &[String] {
        &self.transcript
    }

    pub fn dom_output(&self) -> &[String] {
        &self.dom_output
    }

    pub fn inputs(&self) -> &[String] {
        &self.inputs
    }

    /// Requests still waiting for (or queued behind) a result
    pub fn outstanding(&self) -> usize {
        self.scripts.outstanding() + self.queries.outstanding()
    }

    fn issue_ticket(&mut self) -> ScriptTicket {
        self.next_ticket += 1;
        ScriptTicket(self.next_ticket)
    }
}

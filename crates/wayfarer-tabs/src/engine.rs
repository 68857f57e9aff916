//! Embedded engine seam
//!
//! Engines are driven fire-and-forget. Anything asynchronous (navigation,
//! load completion, script results) comes back as an [`EngineEvent`] on the
//! channel handed over in [`EngineContext`], tagged with the owning tab so
//! the receiver can drop events for tabs that no longer exist.

use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender};

use crate::requests::RequestInterceptor;
use crate::tab::TabId;

pub type EngineEventSender = UnboundedSender<EngineEvent>;
pub type EngineEventReceiver = UnboundedReceiver<EngineEvent>;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Engine unavailable: {0}")]
    Unavailable(String),

    #[error("Engine rejected request: {0}")]
    Rejected(String),
}

/// Identifies one script evaluation within a tab
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct ScriptTicket(pub u64);

impl std::fmt::Display for ScriptTicket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Script handed to the engine's evaluator.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum ScriptRequest {
    /// Source evaluated exactly as given
    Expression(String),
    /// A function expression applied to bound arguments
    Call { function: String, args: Vec<Value> },
}

impl ScriptRequest {
    pub fn expression(source: impl Into<String>) -> Self {
        ScriptRequest::Expression(source.into())
    }

    pub fn call(function: impl Into<String>, args: Vec<Value>) -> Self {
        ScriptRequest::Call {
            function: function.into(),
            args,
        }
    }

    /// Single source string for evaluators without argument passing.
    ///
    /// Arguments are embedded as JSON literals, so their content can never
    /// leave the literal it is placed in.
    pub fn to_invocation(&self) -> String {
        match self {
            ScriptRequest::Expression(source) => source.clone(),
            ScriptRequest::Call { function, args } => {
                let args = args
                    .iter()
                    .map(Value::to_string)
                    .collect::<Vec<_>>()
                    .join(", ");
                format!("({})({})", function.trim(), args)
            }
        }
    }
}

/// Callbacks delivered from an engine instance to the shell
#[derive(Debug, Clone, PartialEq)]
pub enum EngineEvent {
    /// The document URL or title changed
    NavigationChanged {
        tab_id: TabId,
        url: String,
        title: String,
    },
    /// A top-level load completed; `ok` is false for failed loads
    LoadFinished {
        tab_id: TabId,
        url: String,
        ok: bool,
    },
    /// A script evaluation resolved. Failures resolve to `null`.
    ScriptCompleted {
        tab_id: TabId,
        ticket: ScriptTicket,
        value: Value,
    },
}

impl EngineEvent {
    pub fn tab_id(&self) -> TabId {
        match self {
            EngineEvent::NavigationChanged { tab_id, .. }
            | EngineEvent::LoadFinished { tab_id, .. }
            | EngineEvent::ScriptCompleted { tab_id, .. } => *tab_id,
        }
    }
}

/// Everything an engine instance needs to report back for its tab
pub struct EngineContext {
    pub tab_id: TabId,
    pub events: EngineEventSender,
    /// Must be invoked for every outbound request before it is issued
    pub interceptor: RequestInterceptor,
}

/// One live engine instance, owned by a single tab
pub trait WebEngine: Send {
    fn load(&mut self, url: &str) -> Result<(), EngineError>;

    fn back(&mut self) -> Result<(), EngineError>;

    fn forward(&mut self) -> Result<(), EngineError>;

    fn reload(&mut self) -> Result<(), EngineError>;

    /// Start evaluating `script`; the result arrives as
    /// [`EngineEvent::ScriptCompleted`] carrying `ticket`.
    fn evaluate(&mut self, ticket: ScriptTicket, script: ScriptRequest) -> Result<(), EngineError>;

    /// Release the instance. No events may be sent afterwards.
    fn shutdown(&mut self) {}
}

/// Creates engine instances of one browser type
pub trait EngineFactory: Send + Sync {
    /// Browser-type tag persisted in the config
    fn kind(&self) -> &str;

    fn create(&self, context: EngineContext) -> Result<Box<dyn WebEngine>, EngineError>;
}

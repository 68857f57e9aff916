//! Wayfarer Tabs
//!
//! A tab owns exactly one embedded engine instance and one request log.
//! The engine itself (rendering, scripting, networking) lives behind the
//! [`WebEngine`] trait and reports back through [`EngineEvent`] messages.

mod engine;
mod error;
mod requests;
mod tab;

pub use engine::{
    EngineContext, EngineError, EngineEvent, EngineEventReceiver, EngineEventSender,
    EngineFactory, ScriptRequest, ScriptTicket, WebEngine,
};
pub use error::TabError;
pub use requests::{RequestInterceptor, RequestLog};
pub use tab::{Tab, TabId};

pub type Result<T> = std::result::Result<T, TabError>;

/// Channel carrying engine callbacks to the shell's event loop
pub fn engine_channel() -> (EngineEventSender, EngineEventReceiver) {
    tokio::sync::mpsc::unbounded_channel()
}

//! Wayfarer Session Management
//!
//! The session is the window's ordered set of open tabs plus the active-tab
//! pointer. At least one tab stays open for the life of the window.

mod error;
mod manager;
mod session;

pub use error::SessionError;
pub use manager::SessionManager;
pub use session::Session;

pub type Result<T> = std::result::Result<T, SessionError>;

//! Tab error types

use thiserror::Error;

use crate::engine::EngineError;
use crate::tab::TabId;

#[derive(Error, Debug)]
pub enum TabError {
    #[error("Tab not found: {0}")]
    NotFound(TabId),

    #[error("Engine error: {0}")]
    Engine(#[from] EngineError),
}

//! Tab data structure
//!
//! A tab displays:
//! - Title (falls back to the URL until the page reports one)
//! - Current URL in the address bar while active

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::engine::{
    EngineContext, EngineEventSender, EngineFactory, ScriptRequest, ScriptTicket, WebEngine,
};
use crate::requests::RequestLog;
use crate::Result;

/// Identity of an open tab. Never reused after the tab closes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TabId(Uuid);

impl TabId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for TabId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for TabId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for TabId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(Self(s.parse()?))
    }
}

pub struct Tab {
    id: TabId,
    /// Current URL
    url: String,
    /// Page title as reported by the engine
    title: String,
    requests: RequestLog,
    engine: Box<dyn WebEngine>,
}

impl Tab {
    /// Spawn an engine instance for a new tab and start loading `url`.
    pub fn open(factory: &dyn EngineFactory, events: EngineEventSender, url: String) -> Result<Self> {
        let id = TabId::new();
        let requests = RequestLog::new();

        let engine = factory.create(EngineContext {
            tab_id: id,
            events,
            interceptor: requests.interceptor(),
        })?;

        let mut tab = Self {
            id,
            url: String::new(),
            title: String::new(),
            requests,
            engine,
        };

        tab.navigate(url)?;

        tracing::debug!(tab_id = %tab.id, engine = %factory.kind(), "Spawned engine");

        Ok(tab)
    }

    pub fn id(&self) -> TabId {
        self.id
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    /// Direct the engine to `url`
    pub fn navigate(&mut self, url: String) -> Result<()> {
        self.engine.load(&url)?;

        self.url = url;
        self.title = String::new(); // Reset title until page loads

        Ok(())
    }

    pub fn back(&mut self) -> Result<()> {
        Ok(self.engine.back()?)
    }

    pub fn forward(&mut self) -> Result<()> {
        Ok(self.engine.forward()?)
    }

    pub fn reload(&mut self) -> Result<()> {
        Ok(self.engine.reload()?)
    }

    pub fn evaluate(&mut self, ticket: ScriptTicket, script: ScriptRequest) -> Result<()> {
        Ok(self.engine.evaluate(ticket, script)?)
    }

    /// Apply a URL/title change reported by the engine
    pub fn apply_navigation(&mut self, url: String, title: String) {
        self.url = url;
        self.title = title;
    }

    /// Requests intercepted so far, in issue order
    pub fn requests(&self) -> Vec<String> {
        self.requests.entries()
    }

    /// Get display title (with fallback to URL)
    pub fn display_title(&self) -> &str {
        if self.title.is_empty() {
            &self.url
        } else {
            &self.title
        }
    }
}

impl Drop for Tab {
    fn drop(&mut self) {
        self.engine.shutdown();
        tracing::debug!(tab_id = %self.id, "Released engine");
    }
}

impl std::fmt::Debug for Tab {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Tab")
            .field("id", &self.id)
            .field("url", &self.url)
            .field("title", &self.title)
            .field("requests", &self.requests.len())
            .finish_non_exhaustive()
    }
}

//! Session Manager
//!
//! Owns every open tab (and with it every engine instance) for one window.

use std::collections::HashMap;

use wayfarer_navigation::normalize_url;
use wayfarer_tabs::{EngineEventSender, EngineFactory, Tab, TabError, TabId};

use crate::error::SessionError;
use crate::session::Session;
use crate::Result;

pub struct SessionManager {
    tabs: HashMap<TabId, Tab>,
    session: Session,
    /// Handed to every engine instance spawned for this window
    events: EngineEventSender,
}

impl SessionManager {
    pub fn new(events: EngineEventSender) -> Self {
        Self {
            tabs: HashMap::new(),
            session: Session::new(),
            events,
        }
    }

    /// Open a tab loading `url` and make it the active tab
    pub fn open_tab(&mut self, factory: &dyn EngineFactory, url: String) -> Result<TabId> {
        let tab = Tab::open(factory, self.events.clone(), url)?;
        let tab_id = tab.id();

        tracing::info!(tab_id = %tab_id, url = %tab.url(), "Opened tab");

        self.tabs.insert(tab_id, tab);
        self.session.add_tab(tab_id);
        self.session.activate(tab_id);

        Ok(tab_id)
    }

    /// Close a tab and release its engine.
    ///
    /// Returns `Ok(false)` without touching anything when `tab_id` is the
    /// only open tab.
    pub fn close_tab(&mut self, tab_id: TabId) -> Result<bool> {
        if !self.tabs.contains_key(&tab_id) {
            return Err(TabError::NotFound(tab_id).into());
        }

        if self.tabs.len() <= 1 {
            tracing::debug!(tab_id = %tab_id, "Refusing to close the last tab");
            return Ok(false);
        }

        let was_active = self.session.is_active(tab_id);
        let index = self.session.remove_tab(tab_id);

        // Dropping the tab shuts its engine down
        self.tabs.remove(&tab_id);

        if was_active {
            let next = index
                .map(|i| i.min(self.session.tab_count().saturating_sub(1)))
                .and_then(|i| self.session.tab_order.get(i).copied());

            if let Some(next) = next {
                self.session.activate(next);
            }
        }

        tracing::info!(tab_id = %tab_id, remaining = self.tabs.len(), "Closed tab");

        Ok(true)
    }

    pub fn activate_tab(&mut self, tab_id: TabId) -> Result<&Tab> {
        if !self.session.activate(tab_id) {
            return Err(TabError::NotFound(tab_id).into());
        }

        self.get(tab_id)
    }

    /// Load address-bar input in a tab. Returns the URL handed to the engine.
    pub fn navigate(&mut self, tab_id: TabId, input: &str) -> Result<String> {
        let url = normalize_url(input);
        self.get_mut(tab_id)?.navigate(url.clone())?;

        tracing::debug!(tab_id = %tab_id, url = %url, "Navigating");

        Ok(url)
    }

    /// Apply an engine-reported URL/title change.
    ///
    /// Returns whether the tab is the active one, or `None` if the tab is no
    /// longer open.
    pub fn on_navigation_changed(
        &mut self,
        tab_id: TabId,
        url: String,
        title: String,
    ) -> Option<bool> {
        let tab = self.tabs.get_mut(&tab_id)?;
        tab.apply_navigation(url, title);

        Some(self.session.is_active(tab_id))
    }

    pub fn contains(&self, tab_id: TabId) -> bool {
        self.tabs.contains_key(&tab_id)
    }

    pub fn get(&self, tab_id: TabId) -> Result<&Tab> {
        self.tabs
            .get(&tab_id)
            .ok_or_else(|| TabError::NotFound(tab_id).into())
    }

    pub fn get_mut(&mut self, tab_id: TabId) -> Result<&mut Tab> {
        self.tabs
            .get_mut(&tab_id)
            .ok_or_else(|| TabError::NotFound(tab_id).into())
    }

    pub fn active_id(&self) -> Option<TabId> {
        self.session.active
    }

    pub fn active_tab(&self) -> Result<&Tab> {
        let tab_id = self.session.active.ok_or(SessionError::NoActiveTab)?;
        self.get(tab_id)
    }

    pub fn active_tab_mut(&mut self) -> Result<&mut Tab> {
        let tab_id = self.session.active.ok_or(SessionError::NoActiveTab)?;
        self.get_mut(tab_id)
    }

    /// Tabs in tab-strip order
    pub fn ordered_tabs(&self) -> Vec<&Tab> {
        self.session
            .tab_order
            .iter()
            .filter_map(|id| self.tabs.get(id))
            .collect()
    }

    pub fn tab_count(&self) -> usize {
        self.tabs.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;
    use std::sync::Arc;
    use wayfarer_tabs::{
        engine_channel, EngineContext, EngineError, ScriptRequest, ScriptTicket, WebEngine,
    };

    /// Records every URL any of its engines was asked to load
    #[derive(Default)]
    struct RecordingFactory {
        loads: Arc<Mutex<Vec<String>>>,
        shutdowns: Arc<Mutex<usize>>,
    }

    struct RecordingEngine {
        loads: Arc<Mutex<Vec<String>>>,
        shutdowns: Arc<Mutex<usize>>,
    }

    impl WebEngine for RecordingEngine {
        fn load(&mut self, url: &str) -> std::result::Result<(), EngineError> {
            self.loads.lock().push(url.to_string());
            Ok(())
        }

        fn back(&mut self) -> std::result::Result<(), EngineError> {
            Ok(())
        }

        fn forward(&mut self) -> std::result::Result<(), EngineError> {
            Ok(())
        }

        fn reload(&mut self) -> std::result::Result<(), EngineError> {
            Ok(())
        }

        fn evaluate(
            &mut self,
            _ticket: ScriptTicket,
            _script: ScriptRequest,
        ) -> std::result::Result<(), EngineError> {
            Ok(())
        }

        fn shutdown(&mut self) {
            *self.shutdowns.lock() += 1;
        }
    }

    impl EngineFactory for RecordingFactory {
        fn kind(&self) -> &str {
            "recording"
        }

        fn create(
            &self,
            _context: EngineContext,
        ) -> std::result::Result<Box<dyn WebEngine>, EngineError> {
            Ok(Box::new(RecordingEngine {
                loads: Arc::clone(&self.loads),
                shutdowns: Arc::clone(&self.shutdowns),
            }))
        }
    }

    fn manager() -> SessionManager {
        let (tx, _rx) = engine_channel();
        SessionManager::new(tx)
    }

    #[test]
    fn test_open_tab_becomes_active() {
        let factory = RecordingFactory::default();
        let mut manager = manager();

        let first = manager
            .open_tab(&factory, "https://a.test".to_string())
            .unwrap();
        let second = manager
            .open_tab(&factory, "https://b.test".to_string())
            .unwrap();

        assert_eq!(manager.active_id(), Some(second));
        assert_eq!(manager.tab_count(), 2);

        let urls: Vec<&str> = manager.ordered_tabs().iter().map(|t| t.url()).collect();
        assert_eq!(urls, vec!["https://a.test", "https://b.test"]);

        manager.activate_tab(first).unwrap();
        assert_eq!(manager.active_tab().unwrap().id(), first);
    }

    #[test]
    fn test_closing_last_tab_is_noop() {
        let factory = RecordingFactory::default();
        let mut manager = manager();
        let only = manager
            .open_tab(&factory, "https://a.test".to_string())
            .unwrap();

        assert!(!manager.close_tab(only).unwrap());
        assert_eq!(manager.tab_count(), 1);
        assert_eq!(manager.active_id(), Some(only));
        assert_eq!(*factory.shutdowns.lock(), 0);
    }

    #[test]
    fn test_close_active_selects_neighbour() {
        let factory = RecordingFactory::default();
        let mut manager = manager();
        let a = manager.open_tab(&factory, "https://a.test".to_string()).unwrap();
        let b = manager.open_tab(&factory, "https://b.test".to_string()).unwrap();
        let c = manager.open_tab(&factory, "https://c.test".to_string()).unwrap();

        manager.activate_tab(b).unwrap();
        assert!(manager.close_tab(b).unwrap());
        assert_eq!(manager.active_id(), Some(c));
        assert_eq!(*factory.shutdowns.lock(), 1);

        assert!(manager.close_tab(c).unwrap());
        assert_eq!(manager.active_id(), Some(a));
        assert!(!manager.contains(c));
    }

    #[test]
    fn test_close_unknown_tab() {
        let factory = RecordingFactory::default();
        let mut manager = manager();
        manager.open_tab(&factory, "https://a.test".to_string()).unwrap();

        let result = manager.close_tab(TabId::new());
        assert!(matches!(
            result,
            Err(SessionError::Tab(TabError::NotFound(_)))
        ));
    }

    #[test]
    fn test_navigate_prepends_scheme() {
        let factory = RecordingFactory::default();
        let mut manager = manager();
        let tab = manager.open_tab(&factory, "about:blank".to_string()).unwrap();

        let url = manager.navigate(tab, "example.com").unwrap();

        assert_eq!(url, "https://example.com");
        assert_eq!(
            factory.loads.lock().last().map(String::as_str),
            Some("https://example.com")
        );
        assert_eq!(manager.get(tab).unwrap().url(), "https://example.com");
    }

    #[test]
    fn test_navigation_changed_for_closed_tab() {
        let factory = RecordingFactory::default();
        let mut manager = manager();
        let a = manager.open_tab(&factory, "https://a.test".to_string()).unwrap();
        let b = manager.open_tab(&factory, "https://b.test".to_string()).unwrap();

        assert_eq!(
            manager.on_navigation_changed(a, "https://a.test/".into(), "A".into()),
            Some(false)
        );
        assert_eq!(manager.get(a).unwrap().display_title(), "A");

        manager.close_tab(b).unwrap();
        assert_eq!(
            manager.on_navigation_changed(b, "https://b.test/".into(), "B".into()),
            None
        );
    }
}

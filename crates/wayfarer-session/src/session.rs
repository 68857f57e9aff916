//! Session data structure

use wayfarer_tabs::TabId;

#[derive(Debug, Clone)]
pub struct Session {
    /// Ordered list of tab IDs (display order in the tab strip)
    pub tab_order: Vec<TabId>,
    /// Currently focused tab
    pub active: Option<TabId>,
}

impl Session {
    pub fn new() -> Self {
        Self {
            tab_order: Vec::new(),
            active: None,
        }
    }

    /// Append a tab ID to the order list
    pub fn add_tab(&mut self, tab_id: TabId) {
        if !self.tab_order.contains(&tab_id) {
            self.tab_order.push(tab_id);
        }
    }

    /// Remove a tab ID, returning the slot it occupied
    pub fn remove_tab(&mut self, tab_id: TabId) -> Option<usize> {
        let index = self.position(tab_id)?;
        self.tab_order.remove(index);

        if self.active == Some(tab_id) {
            self.active = None;
        }

        Some(index)
    }

    pub fn activate(&mut self, tab_id: TabId) -> bool {
        if !self.tab_order.contains(&tab_id) {
            return false;
        }

        self.active = Some(tab_id);
        true
    }

    pub fn is_active(&self, tab_id: TabId) -> bool {
        self.active == Some(tab_id)
    }

    pub fn position(&self, tab_id: TabId) -> Option<usize> {
        self.tab_order.iter().position(|id| *id == tab_id)
    }

    pub fn tab_count(&self) -> usize {
        self.tab_order.len()
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

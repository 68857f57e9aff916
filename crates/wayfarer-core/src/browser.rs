//! Main browser state container
//!
//! One `Browser` per window. It owns the config store, every open tab and
//! its console, and the queue of notices for the user. Engine callbacks and
//! background results are applied through `&mut self` on the UI thread, so
//! there is no locking at this level.

use serde_json::Value;
use std::collections::HashMap;
use std::future::Future;
use std::mem;
use std::path::{Path, PathBuf};

use wayfarer_archive::{ArchivedSnapshot, LookupError, SnapshotClient};
use wayfarer_devtools::DevConsole;
use wayfarer_download::{best_effort_file_name, Download, DownloadError, Downloader};
use wayfarer_navigation::{file_url, normalize_url, HistoryManager, NavigationError};
use wayfarer_session::SessionManager;
use wayfarer_storage::{ConfigStore, HistoryEntry, StorageError, Theme};
use wayfarer_tabs::{EngineEvent, EngineEventSender, ScriptRequest, ScriptTicket, Tab, TabId};

use crate::bookmarks::BookmarkManager;
use crate::error::CoreError;
use crate::notice::Notice;
use crate::options::BrowserOptions;
use crate::registry::EngineRegistry;
use crate::Result;

pub const HELP_TEXT: &str = "Wayfarer Browser
Features:
- Multiple tabs
- Bookmarks & History
- Developer Console with JS, DOM & Network
- Themes: Light / Dark / Solarized / AMOLED
- View past snapshots (Wayback Machine)
";

pub struct Browser {
    options: BrowserOptions,
    store: ConfigStore,
    history: HistoryManager,
    bookmarks: BookmarkManager,
    registry: EngineRegistry,
    sessions: SessionManager,
    /// One console per open tab
    consoles: HashMap<TabId, DevConsole>,
    /// Text shown in the address bar for the active tab
    address_bar: String,
    notices: Vec<Notice>,
    snapshots: SnapshotClient,
    downloader: Downloader,
}

impl Browser {
    /// Load the config and open the first tab at the home page.
    pub fn new(
        options: BrowserOptions,
        registry: EngineRegistry,
        events: EngineEventSender,
    ) -> Result<Self> {
        let store = ConfigStore::open(&options.config_path);
        let snapshots = SnapshotClient::new(options.archive_endpoint.clone());

        let mut browser = Self {
            history: HistoryManager::new(store.clone()),
            bookmarks: BookmarkManager::new(store.clone()),
            store,
            registry,
            sessions: SessionManager::new(events),
            consoles: HashMap::new(),
            address_bar: String::new(),
            notices: Vec::new(),
            snapshots,
            downloader: Downloader::new(),
            options,
        };

        browser.open_tab(None)?;

        tracing::info!(
            config = %browser.store.path().display(),
            browser_type = %browser.browser_type(),
            "Browser initialized"
        );

        Ok(browser)
    }

    pub fn options(&self) -> &BrowserOptions {
        &self.options
    }

    // === Tab operations ===

    /// Open a tab at `url` (home when absent) and make it active
    pub fn open_tab(&mut self, url: Option<&str>) -> Result<TabId> {
        let url = match url {
            Some(url) => normalize_url(url),
            None => normalize_url(&self.home()),
        };

        let kind = self.browser_type();
        let factory = self.registry.resolve(&kind);
        let tab_id = self.sessions.open_tab(factory.as_ref(), url)?;

        self.consoles.insert(tab_id, DevConsole::new());
        self.refresh_address_bar();

        Ok(tab_id)
    }

    /// Returns false when `tab_id` is the last open tab
    pub fn close_tab(&mut self, tab_id: TabId) -> Result<bool> {
        let closed = self.sessions.close_tab(tab_id)?;

        if closed {
            // Pending console results for this tab go with it
            self.consoles.remove(&tab_id);
            self.refresh_address_bar();
        }

        Ok(closed)
    }

    pub fn activate_tab(&mut self, tab_id: TabId) -> Result<()> {
        self.sessions.activate_tab(tab_id)?;
        self.refresh_address_bar();
        Ok(())
    }

    pub fn active_tab(&self) -> Result<&Tab> {
        Ok(self.sessions.active_tab()?)
    }

    pub fn active_tab_id(&self) -> Option<TabId> {
        self.sessions.active_id()
    }

    /// Tabs in tab-strip order
    pub fn tabs(&self) -> Vec<&Tab> {
        self.sessions.ordered_tabs()
    }

    pub fn tab_count(&self) -> usize {
        self.sessions.tab_count()
    }

    pub fn address_bar(&self) -> &str {
        &self.address_bar
    }

    // === Navigation ===

    /// Load address-bar input in the active tab
    pub fn navigate(&mut self, input: &str) -> Result<String> {
        let tab_id = self.require_active()?;
        self.navigate_tab(tab_id, input)
    }

    pub fn navigate_tab(&mut self, tab_id: TabId, input: &str) -> Result<String> {
        let url = self.sessions.navigate(tab_id, input)?;

        if self.sessions.active_id() == Some(tab_id) {
            self.address_bar = url.clone();
        }

        Ok(url)
    }

    pub fn navigate_home(&mut self) -> Result<String> {
        let home = self.home();
        self.navigate(&home)
    }

    pub fn back(&mut self) -> Result<()> {
        Ok(self.sessions.active_tab_mut()?.back()?)
    }

    pub fn forward(&mut self) -> Result<()> {
        Ok(self.sessions.active_tab_mut()?.forward()?)
    }

    pub fn reload(&mut self) -> Result<()> {
        Ok(self.sessions.active_tab_mut()?.reload()?)
    }

    /// Open a local HTML document in a new tab
    pub fn open_local_file<P: AsRef<Path>>(&mut self, path: P) -> Result<TabId> {
        let url = file_url(path)?;
        self.open_tab(Some(&url))
    }

    // === Engine callbacks ===

    /// Apply one engine callback. Callbacks for closed tabs are dropped.
    pub fn handle_engine_event(&mut self, event: EngineEvent) {
        let tab_id = event.tab_id();
        if !self.sessions.contains(tab_id) {
            tracing::debug!(tab_id = %tab_id, "Dropping event for closed tab");
            return;
        }

        match event {
            EngineEvent::NavigationChanged { tab_id, url, title } => {
                let is_active = self
                    .sessions
                    .on_navigation_changed(tab_id, url.clone(), title);

                if is_active == Some(true) {
                    self.address_bar = url;
                }
            }
            EngineEvent::LoadFinished { tab_id, url, ok } => {
                if !ok {
                    tracing::debug!(tab_id = %tab_id, url = %url, "Load failed, not recorded");
                    return;
                }

                if let Err(e) = self.history.record_visit(&url) {
                    self.history_failed(e);
                }
            }
            EngineEvent::ScriptCompleted {
                tab_id,
                ticket,
                value,
            } => {
                if let Some(console) = self.consoles.get_mut(&tab_id) {
                    console.complete(ticket, value);
                }
            }
        }
    }

    // === Developer console ===

    /// Evaluate `code` in the active tab. `None` when the input is empty.
    pub fn run_script(&mut self, code: &str) -> Result<Option<ScriptTicket>> {
        let tab_id = self.require_active()?;
        let request = self.console_mut(tab_id).run_script(code);
        self.dispatch_script(tab_id, request)
    }

    /// Outline every element matching `selector` in the active tab
    pub fn highlight_selector(&mut self, selector: &str) -> Result<Option<ScriptTicket>> {
        let tab_id = self.require_active()?;
        let request = self.console_mut(tab_id).highlight_selector(selector);
        self.dispatch_script(tab_id, request)
    }

    pub fn console(&self, tab_id: TabId) -> Option<&DevConsole> {
        self.consoles.get(&tab_id)
    }

    pub fn active_console(&self) -> Option<&DevConsole> {
        self.sessions
            .active_id()
            .and_then(|id| self.consoles.get(&id))
    }

    /// Request log of the active tab
    pub fn list_requests(&self) -> Result<Vec<String>> {
        Ok(self.active_tab()?.requests())
    }

    pub fn requests(&self, tab_id: TabId) -> Result<Vec<String>> {
        Ok(self.sessions.get(tab_id)?.requests())
    }

    fn dispatch_script(
        &mut self,
        tab_id: TabId,
        request: Option<(ScriptTicket, ScriptRequest)>,
    ) -> Result<Option<ScriptTicket>> {
        let Some((ticket, script)) = request else {
            return Ok(None);
        };

        if let Err(e) = self.sessions.get_mut(tab_id)?.evaluate(ticket, script) {
            tracing::warn!(tab_id = %tab_id, ticket = %ticket, error = %e, "Evaluation rejected");
            self.console_mut(tab_id).complete(ticket, Value::Null);
        }

        Ok(Some(ticket))
    }

    fn console_mut(&mut self, tab_id: TabId) -> &mut DevConsole {
        self.consoles.entry(tab_id).or_default()
    }

    // === History ===

    pub fn history_entries(&self) -> Vec<HistoryEntry> {
        self.history.list()
    }

    /// History as `[HH:MM:SS] url` lines
    pub fn list_history(&self) -> Vec<String> {
        self.history
            .list()
            .iter()
            .map(HistoryEntry::display_line)
            .collect()
    }

    pub fn open_history_entry(&mut self, index: usize) -> Result<String> {
        let entry = self.history.get(index)?;
        self.navigate(&entry.url)
    }

    pub fn clear_history(&mut self) {
        if let Err(e) = self.history.clear_all() {
            self.history_failed(e);
        }
    }

    // === Bookmarks ===

    /// Returns whether `url` was newly added
    pub fn add_bookmark(&mut self, url: &str) -> bool {
        match self.bookmarks.add(url) {
            Ok(added) => added,
            Err(e) => {
                self.save_failed(e);
                // Still added in memory
                true
            }
        }
    }

    /// Bookmark the active tab's current URL
    pub fn bookmark_current_page(&mut self) -> Result<bool> {
        let url = self.active_tab()?.url().to_string();
        let added = self.add_bookmark(&url);

        if added {
            self.notices.push(Notice::info(
                "Bookmark Added",
                format!("{} added to bookmarks.", url),
            ));
        }

        Ok(added)
    }

    pub fn remove_bookmark(&mut self, url: &str) -> bool {
        let was_present = self.bookmarks.contains(url);

        match self.bookmarks.remove(url) {
            Ok(removed) => removed,
            Err(e) => {
                self.save_failed(e);
                was_present
            }
        }
    }

    pub fn list_bookmarks(&self) -> Vec<String> {
        self.bookmarks.list()
    }

    pub fn open_bookmark(&mut self, url: &str) -> Result<String> {
        self.navigate(url)
    }

    // === Settings ===

    pub fn home(&self) -> String {
        self.store.read(|config| config.home.clone())
    }

    pub fn set_home(&mut self, input: &str) -> String {
        let home = normalize_url(input);
        let result = self.store.update(|config| config.home = home.clone());

        if let Err(e) = result {
            self.save_failed(e);
        }

        tracing::info!(home = %home, "Home page changed");
        home
    }

    pub fn theme(&self) -> Theme {
        self.store.read(|config| config.theme)
    }

    pub fn set_theme(&mut self, theme: Theme) {
        if let Err(e) = self.store.update(|config| config.theme = theme) {
            self.save_failed(e);
        }

        tracing::info!(theme = %theme, "Theme changed");
    }

    /// Persisted browser-type tag
    pub fn browser_type(&self) -> String {
        self.store.read(|config| config.browser_type.clone())
    }

    /// Tags with a registered engine
    pub fn browser_types(&self) -> Vec<&str> {
        self.registry.kinds()
    }

    /// Select the engine used for tabs opened from now on
    pub fn set_browser_type(&mut self, kind: &str) -> Result<()> {
        if !self.registry.contains(kind) {
            return Err(CoreError::UnsupportedBrowserType(kind.to_string()));
        }

        if let Err(e) = self
            .store
            .update(|config| config.browser_type = kind.to_string())
        {
            self.save_failed(e);
        }

        self.notices.push(Notice::info(
            "Browser Type",
            format!("Browser type set to {}", kind),
        ));

        Ok(())
    }

    // === Snapshot lookup ===

    /// Look up the closest archived copy of `url`.
    ///
    /// The future does not borrow the browser; run it off the UI loop and
    /// hand the outcome to [`Browser::open_snapshot`].
    pub fn lookup_snapshot(
        &self,
        url: &str,
    ) -> impl Future<Output = std::result::Result<ArchivedSnapshot, LookupError>> + Send + 'static
    {
        let client = self.snapshots.clone();
        let url = url.trim().to_string();

        async move { client.lookup(&url).await }
    }

    /// Apply a lookup outcome: open the snapshot in a new tab on success.
    pub fn open_snapshot(
        &mut self,
        result: std::result::Result<ArchivedSnapshot, LookupError>,
    ) -> Option<TabId> {
        match result {
            Ok(snapshot) => match self.open_tab(Some(&snapshot.url)) {
                Ok(tab_id) => {
                    tracing::info!(tab_id = %tab_id, url = %snapshot.url, "Loaded snapshot");
                    self.notices.push(Notice::info(
                        "Snapshot Loaded",
                        format!("Loaded snapshot: {}", snapshot.url),
                    ));
                    Some(tab_id)
                }
                Err(e) => {
                    tracing::warn!(url = %snapshot.url, error = %e, "Cannot open snapshot");
                    self.notices.push(Notice::warning(
                        "Error",
                        format!("Failed to fetch snapshot: {}", e),
                    ));
                    None
                }
            },
            Err(LookupError::NotFound) => {
                self.notices.push(Notice::info(
                    "No Archive",
                    "No past snapshot found for this URL.",
                ));
                None
            }
            Err(LookupError::LookupFailed(detail)) => {
                tracing::warn!(error = %detail, "Snapshot lookup failed");
                self.notices.push(Notice::warning(
                    "Error",
                    format!("Failed to fetch snapshot: {}", detail),
                ));
                None
            }
        }
    }

    // === Downloads ===

    /// Fetch `url` to `destination`, or into the download directory under a
    /// name taken from the URL.
    pub fn download(
        &self,
        url: &str,
        destination: Option<PathBuf>,
    ) -> impl Future<Output = std::result::Result<Download, DownloadError>> + Send + 'static {
        let url = url.trim().to_string();
        let destination = destination
            .unwrap_or_else(|| self.options.download_dir.join(best_effort_file_name(&url)));
        let downloader = self.downloader.clone();

        async move { downloader.fetch(&url, &destination).await }
    }

    pub fn finish_download(&mut self, result: std::result::Result<Download, DownloadError>) {
        match result {
            Ok(download) => {
                tracing::info!(
                    url = %download.url,
                    path = %download.file_path.display(),
                    "Downloaded"
                );
                self.notices.push(Notice::info(
                    "Download Complete",
                    "File downloaded successfully.",
                ));
            }
            Err(e) => {
                tracing::warn!(error = %e, "Download failed");
                self.notices
                    .push(Notice::warning("Error", format!("Download failed: {}", e)));
            }
        }
    }

    // === Notices ===

    /// Drain queued notices, oldest first
    pub fn take_notices(&mut self) -> Vec<Notice> {
        mem::take(&mut self.notices)
    }

    pub fn help_text(&self) -> &'static str {
        HELP_TEXT
    }

    fn require_active(&self) -> Result<TabId> {
        self.sessions
            .active_id()
            .ok_or_else(|| CoreError::Session(wayfarer_session::SessionError::NoActiveTab))
    }

    fn refresh_address_bar(&mut self) {
        self.address_bar = self
            .sessions
            .active_tab()
            .map(|tab| tab.url().to_string())
            .unwrap_or_default();
    }

    fn history_failed(&mut self, error: NavigationError) {
        match error {
            NavigationError::Storage(e) => self.save_failed(e),
            other => tracing::warn!(error = %other, "History update failed"),
        }
    }

    fn save_failed(&mut self, error: StorageError) {
        tracing::warn!(error = %error, "Failed to save config");
        self.notices.push(Notice::warning("Error", error.to_string()));
    }
}

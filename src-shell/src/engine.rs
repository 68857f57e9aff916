//! Headless reference engine
//!
//! Fetches documents over HTTP(S) or from disk and reports URL, title and
//! load completion the way an embedded renderer would. It has no script
//! runtime: evaluations resolve to `null`, except the console's DOM
//! highlight query, which is answered from the fetched markup.

use parking_lot::Mutex;
use reqwest::redirect::Policy;
use scraper::{Html, Selector};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;

use wayfarer_core::{
    EngineContext, EngineError, EngineEvent, EngineEventSender, EngineFactory, RequestInterceptor,
    ScriptRequest, ScriptTicket, TabId, WebEngine, DEFAULT_BROWSER_TYPE, HIGHLIGHT_FUNCTION,
};

const MAX_REDIRECTS: usize = 5;

#[derive(Debug, Clone)]
pub struct HeadlessFactory {
    use_system_proxy: bool,
    timeout: Duration,
}

impl HeadlessFactory {
    pub fn new() -> Self {
        Self {
            use_system_proxy: true,
            timeout: Duration::from_secs(12),
        }
    }

    /// Connect directly, ignoring proxy environment variables
    pub fn direct(mut self) -> Self {
        self.use_system_proxy = false;
        self
    }

    /// One client per tab, so redirect hops land in that tab's request log
    fn client(&self, interceptor: RequestInterceptor) -> Result<reqwest::Client, EngineError> {
        let mut builder = reqwest::Client::builder()
            .redirect(Policy::custom(move |attempt| {
                if attempt.previous().len() > MAX_REDIRECTS {
                    return attempt.error("too many redirects");
                }
                interceptor.intercept("GET", attempt.url().as_str());
                attempt.follow()
            }))
            .timeout(self.timeout)
            .user_agent("Mozilla/5.0 (Wayfarer Headless)");

        if !self.use_system_proxy {
            builder = builder.no_proxy();
        }

        builder
            .build()
            .map_err(|e| EngineError::Unavailable(e.to_string()))
    }
}

impl Default for HeadlessFactory {
    fn default() -> Self {
        Self::new()
    }
}

impl EngineFactory for HeadlessFactory {
    fn kind(&self) -> &str {
        DEFAULT_BROWSER_TYPE
    }

    fn create(&self, context: EngineContext) -> Result<Box<dyn WebEngine>, EngineError> {
        let runtime = Handle::try_current().map_err(|e| EngineError::Unavailable(e.to_string()))?;
        let client = self.client(context.interceptor.clone())?;

        Ok(Box::new(HeadlessEngine {
            tab_id: context.tab_id,
            events: context.events,
            interceptor: context.interceptor,
            client,
            runtime,
            current: None,
            back_stack: Vec::new(),
            forward_stack: Vec::new(),
            slot: Arc::new(Mutex::new(LoadSlot::default())),
            task: None,
        }))
    }
}

#[derive(Debug, Clone)]
struct Page {
    url: String,
    title: String,
    html: String,
}

impl Page {
    fn new(url: String, html: String) -> Self {
        let title = extract_title(&html);
        Self { url, title, html }
    }
}

/// Result of the newest load. A task only settles here while its generation
/// is still the latest one.
#[derive(Debug, Default)]
struct LoadSlot {
    generation: u64,
    page: Option<Page>,
}

pub struct HeadlessEngine {
    tab_id: TabId,
    events: EngineEventSender,
    interceptor: RequestInterceptor,
    client: reqwest::Client,
    runtime: Handle,
    current: Option<String>,
    back_stack: Vec<String>,
    forward_stack: Vec<String>,
    slot: Arc<Mutex<LoadSlot>>,
    /// In-flight load; replaced (and aborted) by the next one
    task: Option<JoinHandle<()>>,
}

impl HeadlessEngine {
    fn start(&mut self, url: String) {
        if let Some(task) = self.task.take() {
            task.abort();
        }

        self.current = Some(url.clone());
        let generation = {
            let mut slot = self.slot.lock();
            slot.generation += 1;
            slot.page = None;
            slot.generation
        };

        if url.starts_with("http://") || url.starts_with("https://") {
            self.interceptor.intercept("GET", &url);
        }

        let tab_id = self.tab_id;
        let events = self.events.clone();
        let client = self.client.clone();
        let slot = Arc::clone(&self.slot);

        self.task = Some(self.runtime.spawn(async move {
            let result = load_page(&client, &url).await;
            settle(&slot, generation, tab_id, &events, url, result);
        }));
    }

    fn select(&self, selector: &str) -> Value {
        let slot = self.slot.lock();
        let Some(page) = slot.page.as_ref() else {
            return Value::Null;
        };

        let Ok(selector) = Selector::parse(selector) else {
            return Value::Null;
        };

        let doc = Html::parse_document(&page.html);
        Value::Array(
            doc.select(&selector)
                .map(|el| Value::String(el.html()))
                .collect(),
        )
    }
}

impl WebEngine for HeadlessEngine {
    fn load(&mut self, url: &str) -> Result<(), EngineError> {
        if let Some(current) = self.current.take() {
            self.back_stack.push(current);
        }
        self.forward_stack.clear();

        self.start(url.to_string());
        Ok(())
    }

    fn back(&mut self) -> Result<(), EngineError> {
        let previous = self
            .back_stack
            .pop()
            .ok_or_else(|| EngineError::Rejected("No previous page".to_string()))?;

        if let Some(current) = self.current.take() {
            self.forward_stack.push(current);
        }

        self.start(previous);
        Ok(())
    }

    fn forward(&mut self) -> Result<(), EngineError> {
        let next = self
            .forward_stack
            .pop()
            .ok_or_else(|| EngineError::Rejected("No next page".to_string()))?;

        if let Some(current) = self.current.take() {
            self.back_stack.push(current);
        }

        self.start(next);
        Ok(())
    }

    fn reload(&mut self) -> Result<(), EngineError> {
        let url = self
            .current
            .clone()
            .ok_or_else(|| EngineError::Rejected("Nothing to reload".to_string()))?;

        self.start(url);
        Ok(())
    }

    fn evaluate(&mut self, ticket: ScriptTicket, script: ScriptRequest) -> Result<(), EngineError> {
        let value = match &script {
            ScriptRequest::Call { function, args } if function == HIGHLIGHT_FUNCTION => {
                match args.first().and_then(Value::as_str) {
                    Some(selector) => self.select(selector),
                    None => Value::Null,
                }
            }
            _ => Value::Null,
        };

        self.events
            .send(EngineEvent::ScriptCompleted {
                tab_id: self.tab_id,
                ticket,
                value,
            })
            .map_err(|_| EngineError::Unavailable("event channel closed".to_string()))
    }

    fn shutdown(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

/// Publish a finished load. Superseded loads are dropped silently; the slot
/// lock is held throughout so a newer `start` cannot interleave.
fn settle(
    slot: &Mutex<LoadSlot>,
    generation: u64,
    tab_id: TabId,
    events: &EngineEventSender,
    url: String,
    result: Result<Page, String>,
) {
    let mut slot = slot.lock();
    if slot.generation != generation {
        tracing::debug!(tab_id = %tab_id, url = %url, "Dropping superseded load");
        return;
    }

    match result {
        Ok(page) => {
            let _ = events.send(EngineEvent::NavigationChanged {
                tab_id,
                url: page.url.clone(),
                title: page.title.clone(),
            });

            let final_url = page.url.clone();
            slot.page = Some(page);

            let _ = events.send(EngineEvent::LoadFinished {
                tab_id,
                url: final_url,
                ok: true,
            });
        }
        Err(e) => {
            tracing::debug!(tab_id = %tab_id, url = %url, error = %e, "Load failed");
            let _ = events.send(EngineEvent::LoadFinished {
                tab_id,
                url,
                ok: false,
            });
        }
    }
}

async fn load_page(client: &reqwest::Client, url: &str) -> Result<Page, String> {
    let parsed = url::Url::parse(url).map_err(|e| e.to_string())?;

    match parsed.scheme() {
        "http" | "https" => {
            let resp = client.get(parsed).send().await.map_err(|e| e.to_string())?;

            if !resp.status().is_success() {
                return Err(format!("HTTP {}", resp.status()));
            }

            let final_url = resp.url().to_string();
            let html = resp.text().await.map_err(|e| e.to_string())?;
            Ok(Page::new(final_url, html))
        }
        "file" => {
            let path = parsed
                .to_file_path()
                .map_err(|_| format!("Not a local path: {}", url))?;
            let html = tokio::fs::read_to_string(&path)
                .await
                .map_err(|e| e.to_string())?;
            Ok(Page::new(url.to_string(), html))
        }
        "about" => Ok(Page::new(url.to_string(), String::new())),
        other => Err(format!("Unsupported scheme: {}", other)),
    }
}

fn extract_title(html: &str) -> String {
    let doc = Html::parse_document(html);
    let Ok(sel) = Selector::parse("title") else {
        return String::new();
    };

    doc.select(&sel)
        .next()
        .map(|el| normalize_whitespace(&el.text().collect::<Vec<_>>().join(" ")))
        .unwrap_or_default()
}

fn normalize_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

//! In-process engine double for browser tests

use parking_lot::Mutex;
use std::sync::Arc;

use wayfarer_tabs::{
    EngineContext, EngineError, EngineFactory, RequestInterceptor, ScriptRequest, ScriptTicket,
    TabId, WebEngine,
};

#[derive(Default)]
pub struct EngineLog {
    pub loads: Vec<(TabId, String)>,
    pub scripts: Vec<(TabId, ScriptTicket, ScriptRequest)>,
    pub shutdowns: Vec<TabId>,
}

/// Records every call; loads are reported to the request log as `GET`.
pub struct FakeFactory {
    pub kind: &'static str,
    pub log: Arc<Mutex<EngineLog>>,
    pub reject_scripts: bool,
}

impl FakeFactory {
    pub fn new(kind: &'static str) -> Self {
        Self {
            kind,
            log: Arc::new(Mutex::new(EngineLog::default())),
            reject_scripts: false,
        }
    }
}

impl EngineFactory for FakeFactory {
    fn kind(&self) -> &str {
        self.kind
    }

    fn create(&self, context: EngineContext) -> Result<Box<dyn WebEngine>, EngineError> {
        Ok(Box::new(FakeEngine {
            tab_id: context.tab_id,
            interceptor: context.interceptor,
            log: Arc::clone(&self.log),
            reject_scripts: self.reject_scripts,
        }))
    }
}

struct FakeEngine {
    tab_id: TabId,
    interceptor: RequestInterceptor,
    log: Arc<Mutex<EngineLog>>,
    reject_scripts: bool,
}

impl WebEngine for FakeEngine {
    fn load(&mut self, url: &str) -> Result<(), EngineError> {
        self.interceptor.intercept("GET", url);
        self.log.lock().loads.push((self.tab_id, url.to_string()));
        Ok(())
    }

    fn back(&mut self) -> Result<(), EngineError> {
        Ok(())
    }

    fn forward(&mut self) -> Result<(), EngineError> {
        Ok(())
    }

    fn reload(&mut self) -> Result<(), EngineError> {
        Ok(())
    }

    fn evaluate(&mut self, ticket: ScriptTicket, script: ScriptRequest) -> Result<(), EngineError> {
        if self.reject_scripts {
            return Err(EngineError::Rejected("scripting disabled".to_string()));
        }
        self.log.lock().scripts.push((self.tab_id, ticket, script));
        Ok(())
    }

    fn shutdown(&mut self) {
        self.log.lock().shutdowns.push(self.tab_id);
    }
}

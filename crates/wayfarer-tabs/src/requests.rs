//! Per-tab network request log

use parking_lot::Mutex;
use std::sync::{Arc, Weak};

/// Append-only list of `"<METHOD> - <URL>"` entries in request-issue order.
///
/// Lives exactly as long as its tab; nothing here is persisted.
#[derive(Debug, Default)]
pub struct RequestLog {
    entries: Arc<Mutex<Vec<String>>>,
}

impl RequestLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Interception hook for the engine's network layer
    pub fn interceptor(&self) -> RequestInterceptor {
        RequestInterceptor {
            entries: Arc::downgrade(&self.entries),
        }
    }

    pub fn entries(&self) -> Vec<String> {
        self.entries.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }
}

/// Observer handed to an engine instance.
///
/// Pass-through only: it records and returns, never blocks, rewrites or
/// cancels the request. Once the owning tab is gone, calls are no-ops.
#[derive(Debug, Clone)]
pub struct RequestInterceptor {
    entries: Weak<Mutex<Vec<String>>>,
}

impl RequestInterceptor {
    pub fn intercept(&self, method: &str, url: &str) {
        if let Some(entries) = self.entries.upgrade() {
            entries.lock().push(format!("{} - {}", method, url));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entries_keep_request_order() {
        let log = RequestLog::new();
        let interceptor = log.interceptor();

        interceptor.intercept("GET", "https://a.test/");
        interceptor.intercept("POST", "https://a.test/api");
        interceptor.intercept("GET", "https://a.test/");

        assert_eq!(
            log.entries(),
            vec![
                "GET - https://a.test/",
                "POST - https://a.test/api",
                "GET - https://a.test/",
            ]
        );
    }

    #[test]
    fn test_interceptor_outliving_log_is_noop() {
        let log = RequestLog::new();
        let interceptor = log.interceptor();
        drop(log);

        interceptor.intercept("GET", "https://late.test/");
    }

    #[test]
    fn test_interceptor_from_other_thread() {
        let log = RequestLog::new();
        let interceptor = log.interceptor();

        std::thread::spawn(move || interceptor.intercept("GET", "https://thread.test/"))
            .join()
            .unwrap();

        assert_eq!(log.len(), 1);
    }
}

//! Shell commands
//!
//! One line in, one JSON [`CommandResult`](tabs::CommandResult) out. Every
//! command goes through [`AppState`]; nothing here holds browser state.

pub mod devtools;
pub mod downloads;
pub mod navigation;
pub mod settings;
pub mod snapshots;
pub mod tabs;

use serde::Serialize;

use crate::state::AppState;
use tabs::CommandResult;

pub const USAGE: &str = "Commands:
  open [url]                 new tab (home page when no url)
  close [tab]                close a tab by index or id
  tabs                       list tabs
  activate <tab>             switch to a tab
  go <url>                   load in the active tab
  back | forward | reload | home
  history [open <n> | clear]
  bookmarks                  list bookmarks
  bookmark [add [url] | remove <url> | open <url>]
  theme [light|dark|solarized|amoled]
  set-home <url>
  browser-type [tag]
  file <path>                open a local HTML file
  download <url> [dest]
  snapshot [url]             closest archived copy
  js <code>                  evaluate in the active tab
  dom <selector>             highlight matching elements
  console | requests
  help | quit";

#[derive(Debug, PartialEq, Eq)]
pub enum Execution {
    /// JSON line for stdout
    Output(String),
    Nothing,
    Quit,
}

fn respond<T: Serialize>(result: CommandResult<T>) -> Execution {
    match serde_json::to_string(&result) {
        Ok(json) => Execution::Output(json),
        Err(e) => {
            tracing::error!(error = %e, "Cannot serialize command result");
            Execution::Output(
                r#"{"success":false,"data":null,"error":"serialization failed"}"#.to_string(),
            )
        }
    }
}

fn usage(text: &str) -> Execution {
    respond(CommandResult::<()>::err(format!("Usage: {}", text)))
}

/// Split off the first word; the rest keeps its inner spacing
fn split_word(input: &str) -> (&str, &str) {
    let input = input.trim();
    match input.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (input, ""),
    }
}

fn optional(rest: &str) -> Option<&str> {
    (!rest.is_empty()).then_some(rest)
}

pub fn execute(state: &AppState, line: &str) -> Execution {
    let (command, rest) = split_word(line);

    tracing::debug!(command = %command, "Executing command");

    match command {
        "" => Execution::Nothing,
        "quit" | "exit" => Execution::Quit,
        "help" => {
            let help = state.with_browser(|browser| Ok(format!("{}\n{}", browser.help_text(), USAGE)));
            respond(CommandResult::from(help))
        }

        // Tabs
        "open" | "new" => respond(tabs::create_tab(state, optional(rest))),
        "close" => respond(tabs::close_tab(state, optional(rest))),
        "tabs" => respond(tabs::list_tabs(state)),
        "activate" => match optional(rest) {
            Some(target) => respond(tabs::activate_tab(state, target)),
            None => usage("activate <tab>"),
        },
        "file" => match optional(rest) {
            Some(path) => respond(tabs::open_file(state, path)),
            None => usage("file <path>"),
        },

        // Navigation
        "go" => match optional(rest) {
            Some(input) => respond(navigation::navigate(state, input)),
            None => usage("go <url>"),
        },
        "back" => respond(navigation::go_back(state)),
        "forward" => respond(navigation::go_forward(state)),
        "reload" => respond(navigation::reload(state)),
        "home" => respond(navigation::go_home(state)),
        "history" => match split_word(rest) {
            ("", _) => respond(navigation::list_history(state)),
            ("open", index) => respond(navigation::open_history_entry(state, index)),
            ("clear", _) => respond(navigation::clear_history(state)),
            _ => usage("history [open <n> | clear]"),
        },

        // Bookmarks and settings
        "bookmarks" => respond(settings::list_bookmarks(state)),
        "bookmark" => match split_word(rest) {
            ("", _) => respond(settings::add_bookmark(state, None)),
            ("add", url) => respond(settings::add_bookmark(state, optional(url))),
            ("remove", url) if !url.is_empty() => respond(settings::remove_bookmark(state, url)),
            ("open", url) if !url.is_empty() => respond(settings::open_bookmark(state, url)),
            _ => usage("bookmark [add [url] | remove <url> | open <url>]"),
        },
        "theme" => match optional(rest) {
            Some(name) => respond(settings::set_theme(state, name)),
            None => respond(settings::get_settings(state)),
        },
        "settings" => respond(settings::get_settings(state)),
        "set-home" => match optional(rest) {
            Some(input) => respond(settings::set_home(state, input)),
            None => usage("set-home <url>"),
        },
        "browser-type" => match optional(rest) {
            Some(kind) => respond(settings::set_browser_type(state, kind)),
            None => respond(settings::get_settings(state)),
        },

        // Background work
        "download" => {
            let (url, destination) = split_word(rest);
            respond(downloads::start_download(state, url, optional(destination)))
        }
        "snapshot" => respond(snapshots::view_snapshot(state, optional(rest))),

        // Developer console
        "js" => match optional(rest) {
            Some(code) => respond(devtools::run_script(state, code)),
            None => usage("js <code>"),
        },
        "dom" => match optional(rest) {
            Some(selector) => respond(devtools::highlight_selector(state, selector)),
            None => usage("dom <selector>"),
        },
        "console" => respond(devtools::get_console(state)),
        "requests" => respond(devtools::list_requests(state)),

        other => respond(CommandResult::<()>::err(format!(
            "Unknown command: {} (try `help`)",
            other
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};
    use crate::state::TaskOutcome;
    use std::sync::Arc;
    use tokio::sync::mpsc::UnboundedReceiver;
    use wayfarer_core::{
        engine_channel, Browser, BrowserOptions, EngineContext, EngineError, EngineEvent,
        EngineEventReceiver, EngineFactory, EngineRegistry, RequestInterceptor, ScriptRequest,
        ScriptTicket, WebEngine,
    };

    /// Logs loads as `GET` and never reports back
    struct QuietFactory;

    struct QuietEngine {
        interceptor: RequestInterceptor,
    }

    impl EngineFactory for QuietFactory {
        fn kind(&self) -> &str {
            "headless"
        }

        fn create(&self, context: EngineContext) -> Result<Box<dyn WebEngine>, EngineError> {
            Ok(Box::new(QuietEngine {
                interceptor: context.interceptor,
            }))
        }
    }

    impl WebEngine for QuietEngine {
        fn load(&mut self, url: &str) -> Result<(), EngineError> {
            self.interceptor.intercept("GET", url);
            Ok(())
        }

        fn back(&mut self) -> Result<(), EngineError> {
            Err(EngineError::Rejected("No previous page".to_string()))
        }

        fn forward(&mut self) -> Result<(), EngineError> {
            Ok(())
        }

        fn reload(&mut self) -> Result<(), EngineError> {
            Ok(())
        }

        fn evaluate(&mut self, _: ScriptTicket, _: ScriptRequest) -> Result<(), EngineError> {
            Ok(())
        }
    }

    struct Shell {
        state: AppState,
        outcomes: UnboundedReceiver<TaskOutcome>,
        _events: EngineEventReceiver,
        dir: tempfile::TempDir,
    }

    fn shell() -> Shell {
        let dir = tempfile::tempdir().unwrap();
        let options = BrowserOptions {
            config_path: dir.path().join("config.json"),
            download_dir: dir.path().join("downloads"),
            archive_endpoint: "http://127.0.0.1:9/wayback/available".to_string(),
        };
        let (tx, rx) = engine_channel();
        let browser =
            Browser::new(options, EngineRegistry::new(Arc::new(QuietFactory)), tx).unwrap();
        let (state, outcomes) = AppState::new(browser);

        Shell {
            state,
            outcomes,
            _events: rx,
            dir,
        }
    }

    fn run(shell: &Shell, line: &str) -> Value {
        match execute(&shell.state, line) {
            Execution::Output(json) => serde_json::from_str(&json).unwrap(),
            other => panic!("expected output, got {:?}", other),
        }
    }

    #[test]
    fn test_blank_and_quit() {
        let shell = shell();
        assert_eq!(execute(&shell.state, "   "), Execution::Nothing);
        assert_eq!(execute(&shell.state, "quit"), Execution::Quit);
        assert_eq!(execute(&shell.state, "exit"), Execution::Quit);
    }

    #[test]
    fn test_unknown_command() {
        let shell = shell();
        let out = run(&shell, "frobnicate now");
        assert_eq!(out["success"], json!(false));
        assert_eq!(out["error"], json!("Unknown command: frobnicate (try `help`)"));
    }

    #[test]
    fn test_tab_lifecycle() {
        let shell = shell();

        let opened = run(&shell, "open example.com");
        assert_eq!(opened["data"]["url"], json!("https://example.com"));
        assert_eq!(opened["data"]["index"], json!(1));
        assert_eq!(opened["data"]["active"], json!(true));

        let listed = run(&shell, "tabs");
        assert_eq!(listed["data"].as_array().unwrap().len(), 2);
        assert_eq!(listed["data"][0]["active"], json!(false));

        let activated = run(&shell, "activate 0");
        assert_eq!(activated["data"]["url"], json!("https://www.google.com"));

        let id = listed["data"][1]["id"].as_str().unwrap().to_string();
        assert_eq!(run(&shell, &format!("close {}", id))["data"], json!(true));

        // Last tab stays open
        assert_eq!(run(&shell, "close")["data"], json!(false));
        assert_eq!(run(&shell, "close 7")["error"], json!("No such tab: 7"));
    }

    #[test]
    fn test_navigation_and_requests() {
        let shell = shell();

        assert_eq!(run(&shell, "go  rust-lang.org ")["data"], json!("https://rust-lang.org"));
        assert_eq!(run(&shell, "back")["success"], json!(false));
        assert_eq!(
            run(&shell, "requests")["data"],
            json!(["GET - https://www.google.com", "GET - https://rust-lang.org"])
        );
        assert_eq!(run(&shell, "go")["error"], json!("Usage: go <url>"));
    }

    #[test]
    fn test_history_commands() {
        let shell = shell();
        let tab_id = shell.state.with_browser(|b| Ok(b.active_tab_id())).unwrap().unwrap();
        shell
            .state
            .with_browser(|b| {
                b.handle_engine_event(EngineEvent::LoadFinished {
                    tab_id,
                    url: "https://a.test/".to_string(),
                    ok: true,
                });
                Ok(())
            })
            .unwrap();

        let listed = run(&shell, "history");
        assert!(listed["data"][0].as_str().unwrap().ends_with("] https://a.test/"));

        assert_eq!(run(&shell, "history open 0")["data"], json!("https://a.test/"));
        assert_eq!(run(&shell, "history open x")["success"], json!(false));

        run(&shell, "history clear");
        assert_eq!(run(&shell, "history")["data"], json!([]));
    }

    #[test]
    fn test_bookmark_commands() {
        let shell = shell();

        assert_eq!(run(&shell, "bookmark")["data"], json!(true));
        assert_eq!(run(&shell, "bookmark add https://a.test")["data"], json!(true));
        assert_eq!(run(&shell, "bookmark add https://a.test")["data"], json!(false));
        assert_eq!(
            run(&shell, "bookmarks")["data"],
            json!(["https://www.google.com", "https://a.test"])
        );

        assert_eq!(run(&shell, "bookmark open https://a.test")["data"], json!("https://a.test"));
        assert_eq!(run(&shell, "bookmark remove https://a.test")["data"], json!(true));
        assert_eq!(run(&shell, "bookmark remove")["success"], json!(false));
    }

    #[test]
    fn test_settings_commands() {
        let shell = shell();

        let themed = run(&shell, "theme Dark");
        assert_eq!(themed["data"]["theme"], json!("dark"));
        assert_eq!(themed["data"]["palette"]["window_background"], json!("#222"));

        assert_eq!(run(&shell, "theme neon")["error"], json!("Unknown theme: neon"));
        assert_eq!(run(&shell, "set-home docs.rs")["data"], json!("https://docs.rs"));

        let settings = run(&shell, "settings");
        assert_eq!(settings["data"]["home"], json!("https://docs.rs"));
        assert_eq!(settings["data"]["browser_types"], json!(["headless"]));

        assert_eq!(run(&shell, "browser-type PyQt5")["success"], json!(false));
        assert_eq!(run(&shell, "browser-type headless")["success"], json!(true));

        let saved = std::fs::read_to_string(shell.dir.path().join("config.json")).unwrap();
        assert!(saved.contains("\"theme\": \"dark\""));
    }

    #[test]
    fn test_console_commands() {
        let shell = shell();

        assert_eq!(run(&shell, "js 1 + 1")["data"], json!(1));
        assert_eq!(run(&shell, "dom p.note")["data"], json!(2));

        let console = run(&shell, "console");
        assert_eq!(console["data"]["transcript"], json!([">>> 1 + 1"]));
        assert_eq!(console["data"]["inputs"], json!(["1 + 1"]));
        assert_eq!(console["data"]["outstanding"], json!(2));
    }

    #[test]
    fn test_open_missing_file() {
        let shell = shell();
        let missing = shell.dir.path().join("missing.html");

        let out = run(&shell, &format!("file {}", missing.display()));
        assert_eq!(out["success"], json!(false));
        assert_eq!(run(&shell, "tabs")["data"].as_array().unwrap().len(), 1);
    }

    #[test]
    fn test_help_lists_commands() {
        let shell = shell();
        let help = run(&shell, "help");
        let text = help["data"].as_str().unwrap();
        assert!(text.starts_with("Wayfarer Browser"));
        assert!(text.contains("snapshot [url]"));
    }

    #[tokio::test]
    async fn test_snapshot_failure_becomes_notice() {
        let mut shell = shell();

        // Nothing listens on the discard port
        assert_eq!(run(&shell, "snapshot")["data"], json!("https://www.google.com"));

        let outcome = shell.outcomes.recv().await.unwrap();
        assert!(matches!(outcome, TaskOutcome::Snapshot(Err(_))));
        shell.state.apply(outcome);

        let notices = shell.state.with_browser(|b| Ok(b.take_notices())).unwrap();
        assert_eq!(notices[0].title, "Error");
        assert!(notices[0].message.starts_with("Failed to fetch snapshot"));
        assert_eq!(run(&shell, "tabs")["data"].as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_download_failure_becomes_notice() {
        let mut shell = shell();

        assert_eq!(run(&shell, "download")["success"], json!(false));
        assert_eq!(run(&shell, "download not-a-url")["data"], json!("not-a-url"));

        let outcome = shell.outcomes.recv().await.unwrap();
        shell.state.apply(outcome);

        let notices = shell.state.with_browser(|b| Ok(b.take_notices())).unwrap();
        assert!(notices[0].message.starts_with("Download failed: Invalid URL"));
    }

    #[test]
    fn test_split_word() {
        assert_eq!(split_word("  js  document.title "), ("js", "document.title"));
        assert_eq!(split_word("tabs"), ("tabs", ""));
        assert_eq!(split_word(""), ("", ""));
    }
}

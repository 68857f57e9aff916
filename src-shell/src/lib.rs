//! Wayfarer Browser - command shell
//!
//! Reads one command per line from stdin and answers with one JSON line on
//! stdout. Engine callbacks and background results are applied on the same
//! loop, so browser state is only ever touched from one place.

mod commands;
mod engine;
mod state;

use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, Stdout};

use commands::Execution;
use state::AppState;
use wayfarer_core::{engine_channel, Browser, BrowserOptions, EngineRegistry};

pub use engine::{HeadlessEngine, HeadlessFactory};

pub fn run() -> anyhow::Result<()> {
    // Initialize logging
    wayfarer_core::init_logging();

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    let result = runtime.block_on(shell());

    // A pending stdin read must not hold up exit
    runtime.shutdown_timeout(Duration::from_millis(500));
    result
}

async fn shell() -> anyhow::Result<()> {
    let options = BrowserOptions::from_env();
    let registry = EngineRegistry::new(Arc::new(HeadlessFactory::new()));
    let (events_tx, mut events) = engine_channel();

    let browser = Browser::new(options, registry, events_tx)?;
    let (state, mut outcomes) = AppState::new(browser);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();

    tracing::info!("Shell ready");

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else {
                    break;
                };

                match commands::execute(&state, &line) {
                    Execution::Output(json) => emit(&mut stdout, &json).await?,
                    Execution::Nothing => {}
                    Execution::Quit => break,
                }
            }
            Some(event) = events.recv() => {
                state.with_browser(|browser| {
                    browser.handle_engine_event(event);
                    Ok(())
                })?;
            }
            Some(outcome) = outcomes.recv() => state.apply(outcome),
        }

        flush_notices(&state, &mut stdout).await?;
    }

    tracing::info!("Shell exiting");
    Ok(())
}

async fn flush_notices(state: &AppState, stdout: &mut Stdout) -> anyhow::Result<()> {
    let notices = state.with_browser(|browser| Ok(browser.take_notices()))?;

    for notice in notices {
        let line = serde_json::to_string(&serde_json::json!({ "notice": notice }))?;
        emit(stdout, &line).await?;
    }

    Ok(())
}

async fn emit(stdout: &mut Stdout, line: &str) -> anyhow::Result<()> {
    stdout.write_all(line.as_bytes()).await?;
    stdout.write_all(b"\n").await?;
    stdout.flush().await?;
    Ok(())
}

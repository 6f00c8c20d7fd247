mod config;
mod db;
mod ipc;
mod model;
mod seed;
mod stats;
mod store;
mod validate;

use std::io::{self, BufRead, Write};
use tracing_subscriber::EnvFilter;

fn init_logging(filter: &str) {
    // stdout carries the protocol; logs go to stderr.
    let filter =
        EnvFilter::try_new(filter).unwrap_or_else(|_| EnvFilter::new(config::DEFAULT_LOG_FILTER));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn main() -> anyhow::Result<()> {
    let cfg = config::Config::from_env()?;
    init_logging(&cfg.log_filter);

    let mut state = ipc::AppState::new(store::Store::seeded()?);
    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        users = state.store.users().len(),
        assignments = state.store.assignments().len(),
        submissions = state.store.submissions().len(),
        "classboardd starting"
    );

    if let Some(path) = cfg.workspace.as_deref() {
        if let Err(e) = ipc::open_workspace(&mut state, path) {
            tracing::warn!(error = %e, "configured workspace could not be opened");
        }
    }

    let stdin = io::stdin();
    let mut stdout = io::stdout();

    for line in stdin.lock().lines() {
        let line = match line {
            Ok(v) => v,
            Err(e) => {
                tracing::error!(error = %e, "stdin read failed");
                break;
            }
        };
        if line.trim().is_empty() {
            continue;
        }

        let req: ipc::Request = match serde_json::from_str(&line) {
            Ok(v) => v,
            Err(e) => {
                // Can't reply without id.
                tracing::warn!(error = %e, "unparseable request");
                let resp = serde_json::json!({
                    "ok": false,
                    "error": { "code": "bad_json", "message": e.to_string() }
                });
                let _ = writeln!(stdout, "{}", resp);
                let _ = stdout.flush();
                continue;
            }
        };

        let resp = ipc::handle_request(&mut state, req);
        let _ = writeln!(
            stdout,
            "{}",
            serde_json::to_string(&resp).unwrap_or_else(|_| "{\"ok\":false}".to_string())
        );
        let _ = stdout.flush();
    }

    tracing::info!("stdin closed; exiting");
    Ok(())
}

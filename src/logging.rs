//! Diagnostic logging setup.
//!
//! The interactive UI owns the terminal, so diagnostics go to a file there;
//! headless runs log to stderr and keep stdout for the event log. `RUST_LOG`
//! overrides the filter; `DEBUG_LOGGING=1` enables debug output for this crate.

use std::fs::File;
use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::anyhow;
use tracing_subscriber::{
    EnvFilter,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

pub const DEFAULT_LOG_FILE: &str = "theatre-bot.log";

#[derive(Clone, Debug)]
pub enum LogTarget {
    File(PathBuf),
    Stderr,
}

fn filter_directive(rust_log: Option<String>, debug_logging: bool) -> String {
    match rust_log {
        Some(directive) if !directive.trim().is_empty() => directive,
        _ if debug_logging => "info,theatre_bot=debug".to_string(),
        _ => "info".to_string(),
    }
}

pub fn init(target: LogTarget) -> anyhow::Result<()> {
    let debug_logging = std::env::var("DEBUG_LOGGING").is_ok_and(|v| v == "1");
    let filter = EnvFilter::new(filter_directive(
        std::env::var("RUST_LOG").ok(),
        debug_logging,
    ));

    match target {
        LogTarget::File(path) => {
            let file = match File::create(&path) {
                Ok(file) => file,
                Err(e) => {
                    eprintln!("Failed to create log file at {:?}: {}, using stderr", path, e);
                    return init(LogTarget::Stderr);
                }
            };
            let file_layer = fmt::layer()
                .with_writer(Mutex::new(file))
                .with_ansi(false)
                .with_target(true)
                .with_span_events(FmtSpan::NONE);
            tracing_subscriber::registry()
                .with(file_layer)
                .with(filter)
                .try_init()
                .map_err(|e| anyhow!("{e}"))?;
            tracing::info!(log_file = ?path, debug_logging, "logging initialized");
        }
        LogTarget::Stderr => {
            let stderr_layer = fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_span_events(FmtSpan::NONE);
            tracing_subscriber::registry()
                .with(stderr_layer)
                .with(filter)
                .try_init()
                .map_err(|e| anyhow!("{e}"))?;
            tracing::info!(debug_logging, "logging initialized (stderr)");
        }
    }
    Ok(())
}

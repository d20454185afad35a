//! Tracing subscriber setup.
//!
//! The interactive UI owns the terminal, so logs only go to `--log-file` when one is given.
//! `--check` runs write to stderr instead.
//!
//! Filter priority: `GQLDOCS_LOG`, then `RUST_LOG`, then the `-v` default.

use std::fs::OpenOptions;
use std::io;
use std::path::Path;
use std::sync::Mutex;

use tracing::Level;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt;
use tracing_subscriber::prelude::*;

const LOG_ENV_VAR: &str = "GQLDOCS_LOG";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogTarget<'a> {
    None,
    Stderr,
    File(&'a Path),
}

impl<'a> LogTarget<'a> {
    /// An explicit log file wins; otherwise only non-interactive runs log, to stderr.
    pub fn select(log_file: Option<&'a Path>, interactive: bool) -> Self {
        match (log_file, interactive) {
            (Some(path), _) => Self::File(path),
            (None, false) => Self::Stderr,
            (None, true) => Self::None,
        }
    }
}

pub fn default_level(verbose: bool) -> Level {
    if verbose { Level::DEBUG } else { Level::INFO }
}

/// Installs the global subscriber. Call once, before the schema is first loaded.
pub fn init(target: LogTarget<'_>, verbose: bool) -> io::Result<()> {
    let filter = build_env_filter(verbose);
    match target {
        LogTarget::None => {}
        LogTarget::Stderr => {
            let use_ansi = io::IsTerminal::is_terminal(&io::stderr());
            tracing_subscriber::registry()
                .with(filter)
                .with(
                    fmt::layer()
                        .with_writer(io::stderr)
                        .with_ansi(use_ansi)
                        .without_time()
                        .compact(),
                )
                .init();
        }
        LogTarget::File(path) => {
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            tracing_subscriber::registry()
                .with(filter)
                .with(
                    fmt::layer()
                        .with_writer(Mutex::new(file))
                        .with_ansi(false)
                        .with_target(true)
                        .with_thread_ids(true),
                )
                .init();
        }
    }
    Ok(())
}

fn build_env_filter(verbose: bool) -> EnvFilter {
    if let Ok(directives) = std::env::var(LOG_ENV_VAR)
        && let Ok(filter) = EnvFilter::try_new(&directives)
    {
        return filter;
    }
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return filter;
    }
    let level = default_level(verbose);
    let directive = if verbose {
        format!("warn,{}={level}", env!("CARGO_CRATE_NAME"))
    } else {
        level.to_string()
    };
    EnvFilter::try_new(&directive).unwrap_or_else(|_| EnvFilter::new(level.as_str()))
}

//! `tracing` subscriber setup.
//!
//! `RUST_LOG` overrides the default filter. The TUI owns the terminal, so it
//! only ever logs to a file.

use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

use crate::error::{AppError, EXIT_CONFIG};

/// Where log events go.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogTarget {
    /// Warnings and errors on stderr (CLI commands).
    Stderr,
    /// Info and above appended to a file.
    File(PathBuf),
    /// No subscriber installed.
    Off,
}

impl LogTarget {
    /// Target for the full-screen form: a file if one was configured, else off.
    pub fn for_tui(log_file: Option<&Path>) -> Self {
        log_file.map_or(LogTarget::Off, |p| LogTarget::File(p.to_path_buf()))
    }

    /// Target for line-oriented commands: a file if configured, else stderr.
    pub fn for_cli(log_file: Option<&Path>) -> Self {
        log_file.map_or(LogTarget::Stderr, |p| LogTarget::File(p.to_path_buf()))
    }

    fn default_directive(&self) -> &'static str {
        match self {
            LogTarget::Stderr => "premium_quote=warn",
            LogTarget::File(_) | LogTarget::Off => "premium_quote=info",
        }
    }
}

/// Install the global subscriber. Calling it twice keeps the first one.
pub fn init(target: LogTarget) -> Result<(), AppError> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(target.default_directive()));

    let installed = match target {
        LogTarget::Off => return Ok(()),
        LogTarget::Stderr => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .try_init(),
        LogTarget::File(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(&path)
                .map_err(|e| {
                    AppError::new(EXIT_CONFIG, format!("Failed to open log file '{}': {e}", path.display()))
                })?;
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .try_init()
        }
    };

    // The only `try_init` failure is a global subscriber that is already
    // installed (e.g. by a test harness); the first one stays in place.
    if let Err(err) = installed {
        tracing::debug!(error = %err, "log subscriber already installed");
    }
    Ok(())
}

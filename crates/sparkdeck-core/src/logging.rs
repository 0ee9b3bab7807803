//! Logging infrastructure for sparkdeck.
//!
//! Structured logging uses the `tracing` ecosystem. The console keeps its own
//! log file separate from the cluster log tail it displays, so diagnostics for
//! the console itself never mix with backend output.
//!
//! ## Features
//!
//! - JSON lines written to `~/.sparkdeck/logs/sparkdeck.log` (rotated daily)
//! - Optional human-readable stderr output (headless commands only, the TUI
//!   owns the terminal)
//! - `-v` raises the default level to DEBUG; `RUST_LOG` overrides everything
//!
//! Background poll failures are logged on the [`POLL_TARGET`] target. That
//! target is the diagnostic channel for failures that are never shown to the
//! operator.
//!
//! ## Example
//!
//! ```no_run
//! use sparkdeck_core::logging;
//!
//! let _guard = logging::init_logging(None, false, true).expect("logging init");
//! tracing::info!("sparkdeck started");
//! tracing::warn!(target: logging::POLL_TARGET, error = "connection refused", "status poll failed");
//! ```

use std::path::PathBuf;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    EnvFilter,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

use crate::error::{DeckError, Result};

/// Tracing target for background refresh diagnostics.
pub const POLL_TARGET: &str = "sparkdeck::poll";

/// Tracing target for mutating request outcomes.
pub const REQUEST_TARGET: &str = "sparkdeck::request";

/// Guard that must be held to ensure log flushing on shutdown.
///
/// Keep this guard alive for the lifetime of the application.
pub struct LogGuard {
    _file_guard: Option<WorkerGuard>,
}

/// Initialize the sparkdeck logging system.
///
/// # Arguments
///
/// * `log_dir` - Optional custom log directory. Defaults to `~/.sparkdeck/logs/`
/// * `verbose` - If true, sets log level to DEBUG. Otherwise uses INFO.
/// * `console` - If true, also log to stderr in a compact format
///
/// # Returns
///
/// A [`LogGuard`] that must be held for the application lifetime.
pub fn init_logging(log_dir: Option<PathBuf>, verbose: bool, console: bool) -> Result<LogGuard> {
    let log_dir = match log_dir {
        Some(dir) => dir,
        None => default_log_dir()?,
    };

    std::fs::create_dir_all(&log_dir).map_err(|e| DeckError::DirectoryCreation {
        path: log_dir.clone(),
        source: e,
    })?;

    let file_appender = tracing_appender::rolling::daily(&log_dir, "sparkdeck.log");
    let (non_blocking_file, file_guard) = tracing_appender::non_blocking(file_appender);

    let default_level = if verbose { "debug" } else { "info" };
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("sparkdeck={default_level}")));

    // JSON layer for file output
    let file_layer = fmt::layer()
        .with_writer(non_blocking_file)
        .with_ansi(false)
        .json()
        .with_span_events(FmtSpan::CLOSE)
        .with_current_span(true)
        .with_span_list(true);

    // Human-readable layer for headless output
    let console_layer = console.then(|| {
        fmt::layer()
            .with_writer(std::io::stderr)
            .with_ansi(true)
            .with_target(true)
            .with_thread_ids(false)
            .with_thread_names(false)
            .with_file(verbose)
            .with_line_number(verbose)
            .compact()
    });

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .with(console_layer)
        .init();

    tracing::debug!(log_dir = %log_dir.display(), verbose, console, "logging initialized");

    Ok(LogGuard {
        _file_guard: Some(file_guard),
    })
}

/// Initialize minimal console-only logging for testing.
pub fn init_test_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new("debug"))
        .with_test_writer()
        .try_init();
}

/// Root directory for sparkdeck state.
///
/// Returns `~/.sparkdeck/`
pub fn home_dir() -> Result<PathBuf> {
    dirs::home_dir()
        .map(|home| home.join(".sparkdeck"))
        .ok_or_else(|| DeckError::internal("could not determine home directory"))
}

/// Get the default log directory path.
///
/// Returns `~/.sparkdeck/logs/`
pub fn default_log_dir() -> Result<PathBuf> {
    Ok(home_dir()?.join("logs"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_log_dir_is_under_home() {
        let dir = default_log_dir().unwrap();
        assert!(dir.ends_with(".sparkdeck/logs"));
    }

    #[test]
    fn test_init_test_logging() {
        // Should not panic, even when called twice
        init_test_logging();
        init_test_logging();
    }
}

//! # sparkdeck-core
//!
//! Core types, errors, and utilities shared by the sparkdeck crates.
//!
//! This crate provides:
//! - [`DeckError`] - Error type for configuration, I/O and terminal failures
//! - [`logging`] - Tracing setup (JSON file log plus optional stderr output)
//! - [`config`] - `~/.sparkdeck/config.yaml` loading with env overrides
//! - [`types`] - The cluster data model exchanged with the backend
//!
//! ## Example
//!
//! ```no_run
//! use sparkdeck_core::{DeckConfig, logging};
//!
//! fn main() -> sparkdeck_core::Result<()> {
//!     let _guard = logging::init_logging(None, false, true)?;
//!     let config = DeckConfig::load(None, None)?;
//!     tracing::info!(api = %config.api_base_url, "configuration loaded");
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod logging;
pub mod types;

// Re-export main types for convenience
pub use config::DeckConfig;
pub use error::{DeckError, Result};
pub use logging::{LogGuard, init_logging};
pub use types::{
    ApplyConfigRequest, ClusterStatus, Cores, CreateNotebookRequest, Memory, NotebookRecord,
    Severity, WorkerEndpoint, WorkerSpec,
};

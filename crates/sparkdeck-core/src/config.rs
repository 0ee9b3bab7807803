//! Console configuration.
//!
//! Loaded from `~/.sparkdeck/config.yaml` when present. Every field is
//! optional; missing fields fall back to the defaults below. The backend base
//! URL can be overridden with the `SPARKDECK_API_BASE` environment variable.
//!
//! ```yaml
//! api_base_url: http://localhost:8000
//! polling:
//!   status_interval_ms: 5000
//!   logs_interval_ms: 3000
//! refresh:
//!   status_delay_ms: 2000
//!   apply_status_delay_ms: 3000
//!   logs_delay_ms: 1000
//! notifications:
//!   visible_ms: 4000
//! defaults:
//!   worker_count: 2
//!   memory: 1g
//!   cores: 1
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{DeckError, Result};
use crate::types::{Cores, Memory, WorkerSpec};

/// Environment variable overriding [`DeckConfig::api_base_url`].
pub const API_BASE_ENV: &str = "SPARKDECK_API_BASE";

/// Top-level console configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeckConfig {
    /// Base URL every API path is resolved against
    pub api_base_url: String,

    /// Per-request timeout in seconds
    pub request_timeout_secs: u64,

    /// Background refresh intervals
    pub polling: PollingConfig,

    /// Out-of-band refresh delays after mutating calls
    pub refresh: RefreshConfig,

    /// Notification lifecycle timings
    pub notifications: NotificationConfig,

    /// Initial worker draft
    pub defaults: DraftDefaults,

    /// Fallback for the cluster's primary UI when the status omits it
    pub master_ui_url: Option<String>,
}

impl Default for DeckConfig {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:8000".to_string(),
            request_timeout_secs: 30,
            polling: PollingConfig::default(),
            refresh: RefreshConfig::default(),
            notifications: NotificationConfig::default(),
            defaults: DraftDefaults::default(),
            master_ui_url: None,
        }
    }
}

/// Background refresh intervals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PollingConfig {
    pub status_interval_ms: u64,
    pub logs_interval_ms: u64,
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            status_interval_ms: 5000,
            logs_interval_ms: 3000,
        }
    }
}

impl PollingConfig {
    pub fn status_interval(&self) -> Duration {
        Duration::from_millis(self.status_interval_ms)
    }

    pub fn logs_interval(&self) -> Duration {
        Duration::from_millis(self.logs_interval_ms)
    }
}

/// Delays before the refreshes scheduled after a successful mutating call.
///
/// Status waits longer than logs because the backend needs time to converge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RefreshConfig {
    /// Status refresh after start/stop
    pub status_delay_ms: u64,
    /// Status refresh after applying a configuration (restart takes longer)
    pub apply_status_delay_ms: u64,
    /// Log refresh after any lifecycle call
    pub logs_delay_ms: u64,
}

impl Default for RefreshConfig {
    fn default() -> Self {
        Self {
            status_delay_ms: 2000,
            apply_status_delay_ms: 3000,
            logs_delay_ms: 1000,
        }
    }
}

impl RefreshConfig {
    pub fn status_delay(&self) -> Duration {
        Duration::from_millis(self.status_delay_ms)
    }

    pub fn apply_status_delay(&self) -> Duration {
        Duration::from_millis(self.apply_status_delay_ms)
    }

    pub fn logs_delay(&self) -> Duration {
        Duration::from_millis(self.logs_delay_ms)
    }
}

/// Notification lifecycle timings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NotificationConfig {
    /// Delay between creation and becoming visible
    pub enter_ms: u64,
    /// Time from creation until the exit transition starts
    pub visible_ms: u64,
    /// Exit transition length before removal
    pub exit_ms: u64,
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            enter_ms: 10,
            visible_ms: 4000,
            exit_ms: 300,
        }
    }
}

/// Shape of the worker draft created at startup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DraftDefaults {
    pub worker_count: usize,
    pub memory: Memory,
    pub cores: Cores,
}

impl Default for DraftDefaults {
    fn default() -> Self {
        Self {
            worker_count: 2,
            memory: Memory::Gb1,
            cores: Cores::One,
        }
    }
}

impl DraftDefaults {
    /// The initial draft entries.
    pub fn workers(&self) -> Vec<WorkerSpec> {
        vec![WorkerSpec::new(self.memory, self.cores); self.worker_count]
    }
}

/// Default config file path: `~/.sparkdeck/config.yaml`.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".sparkdeck").join("config.yaml"))
}

impl DeckConfig {
    /// Load configuration.
    ///
    /// An explicit `path` must exist. Without one, the default path is used
    /// if present and built-in defaults otherwise. The environment override is
    /// applied next, then `api_base` (the `--api-base` flag), and the final
    /// result is validated once.
    pub fn load(path: Option<&Path>, api_base: Option<&str>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::from_yaml(path)?,
            None => match default_config_path() {
                Some(default) if default.exists() => Self::from_yaml(&default)?,
                _ => Self::default(),
            },
        };

        if let Ok(base) = std::env::var(API_BASE_ENV)
            && !base.trim().is_empty()
        {
            config.api_base_url = base.trim().to_string();
        }
        if let Some(base) = api_base
            && !base.trim().is_empty()
        {
            config.api_base_url = base.trim().to_string();
        }

        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a YAML file without env overrides.
    pub fn from_yaml(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                DeckError::ConfigNotFound {
                    path: path.to_path_buf(),
                    source: Some(e),
                }
            } else {
                DeckError::io("reading config", path, e)
            }
        })?;

        Self::from_yaml_str(&content).map_err(|message| DeckError::ConfigInvalid {
            path: path.to_path_buf(),
            message,
        })
    }

    /// Parse configuration from YAML text. An empty document yields defaults.
    pub fn from_yaml_str(content: &str) -> std::result::Result<Self, String> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(content).map_err(|e| e.to_string())
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        let base = self.api_base_url.trim();
        if base.is_empty() {
            return Err(DeckError::config_validation("api_base_url must not be empty"));
        }
        if !(base.starts_with("http://") || base.starts_with("https://")) {
            return Err(DeckError::config_validation(format!(
                "api_base_url must start with http:// or https:// (got {base})"
            )));
        }
        if self.request_timeout_secs == 0 {
            return Err(DeckError::config_validation("request_timeout_secs must be > 0"));
        }
        if self.polling.status_interval_ms == 0 {
            return Err(DeckError::config_validation(
                "polling.status_interval_ms must be > 0",
            ));
        }
        if self.polling.logs_interval_ms == 0 {
            return Err(DeckError::config_validation("polling.logs_interval_ms must be > 0"));
        }
        if self.defaults.worker_count == 0 {
            return Err(DeckError::config_validation(
                "defaults.worker_count must be at least 1",
            ));
        }
        Ok(())
    }

    /// Override the API base URL.
    pub fn with_api_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into();
        self
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_defaults_match_backend_startup() {
        let config = DeckConfig::default();
        assert_eq!(config.polling.status_interval(), Duration::from_secs(5));
        assert_eq!(config.polling.logs_interval(), Duration::from_secs(3));
        assert_eq!(config.notifications.visible_ms, 4000);
        assert_eq!(
            config.defaults.workers(),
            vec![WorkerSpec::new(Memory::Gb1, Cores::One); 2]
        );
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let config = DeckConfig::from_yaml_str(
            "api_base_url: http://spark-host:9000\npolling:\n  logs_interval_ms: 1500\ndefaults:\n  memory: 2g\n  cores: 4\n",
        )
        .unwrap();
        assert_eq!(config.api_base_url, "http://spark-host:9000");
        assert_eq!(config.polling.logs_interval_ms, 1500);
        assert_eq!(config.polling.status_interval_ms, 5000);
        assert_eq!(config.defaults.memory, Memory::Gb2);
        assert_eq!(config.defaults.cores, Cores::Four);
        assert_eq!(config.defaults.worker_count, 2);
    }

    #[test]
    fn test_invalid_cores_rejected() {
        let err = DeckConfig::from_yaml_str("defaults:\n  cores: 5\n");
        assert!(err.is_err());
    }

    #[test]
    fn test_validation_rejects_zero_workers() {
        let mut config = DeckConfig::default();
        config.defaults.worker_count = 0;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("worker_count"));
    }

    #[test]
    fn test_validation_rejects_non_http_base() {
        let config = DeckConfig::default().with_api_base_url("localhost:8000");
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_explicit_missing_path_is_error() {
        let err = DeckConfig::from_yaml(Path::new("/nonexistent/sparkdeck.yaml")).unwrap_err();
        assert!(matches!(err, DeckError::ConfigNotFound { .. }));
    }

    #[test]
    #[serial]
    fn test_load_from_file_with_env_override() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "api_base_url: http://from-file:8000").unwrap();

        // SAFETY: serialized test, no other thread reads the environment
        unsafe { std::env::remove_var(API_BASE_ENV) };
        let config = DeckConfig::load(Some(file.path()), None).unwrap();
        assert_eq!(config.api_base_url, "http://from-file:8000");

        // SAFETY: serialized test
        unsafe { std::env::set_var(API_BASE_ENV, "http://from-env:8000") };
        let config = DeckConfig::load(Some(file.path()), None).unwrap();
        assert_eq!(config.api_base_url, "http://from-env:8000");

        // SAFETY: serialized test
        unsafe { std::env::remove_var(API_BASE_ENV) };
    }

    #[test]
    #[serial]
    fn test_flag_overrides_invalid_env() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "api_base_url: http://from-file:8000").unwrap();

        // SAFETY: serialized test, no other thread reads the environment
        unsafe { std::env::set_var(API_BASE_ENV, "spark-host:8000") };
        let config = DeckConfig::load(Some(file.path()), Some(" http://from-flag:8000 ")).unwrap();
        assert_eq!(config.api_base_url, "http://from-flag:8000");

        // Without the flag the bad env value is still reported
        let err = DeckConfig::load(Some(file.path()), None).unwrap_err();
        assert!(matches!(err, DeckError::ConfigValidation { .. }));

        // SAFETY: serialized test
        unsafe { std::env::remove_var(API_BASE_ENV) };
    }

    #[test]
    #[serial]
    fn test_invalid_flag_rejected() {
        // SAFETY: serialized test
        unsafe { std::env::remove_var(API_BASE_ENV) };
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "request_timeout_secs: 10").unwrap();
        let err = DeckConfig::load(Some(file.path()), Some("localhost:8000")).unwrap_err();
        assert!(err.to_string().contains("localhost:8000"));
    }

    #[test]
    fn test_invalid_yaml_reports_path() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "polling: [not, a, map]").unwrap();
        let err = DeckConfig::from_yaml(file.path()).unwrap_err();
        assert!(matches!(err, DeckError::ConfigInvalid { .. }));
    }
}

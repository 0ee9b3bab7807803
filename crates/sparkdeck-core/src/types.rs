//! Cluster data model shared across sparkdeck crates.
//!
//! These types mirror the backend's JSON contract. The closed [`Memory`] and
//! [`Cores`] enums guarantee the console never sends a value outside the sets
//! the backend accepts.

use std::fmt;

use chrono::{DateTime, Local, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Memory allotted to a single worker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Memory {
    #[serde(rename = "512m")]
    Mb512,
    #[serde(rename = "1g")]
    #[default]
    Gb1,
    #[serde(rename = "2g")]
    Gb2,
    #[serde(rename = "4g")]
    Gb4,
    #[serde(rename = "8g")]
    Gb8,
}

impl Memory {
    /// All memory sizes in ascending order.
    pub const ALL: [Memory; 5] = [Memory::Mb512, Memory::Gb1, Memory::Gb2, Memory::Gb4, Memory::Gb8];

    /// Wire form sent to the backend (`"512m"`, `"1g"`, ...).
    pub fn as_str(&self) -> &'static str {
        match self {
            Memory::Mb512 => "512m",
            Memory::Gb1 => "1g",
            Memory::Gb2 => "2g",
            Memory::Gb4 => "4g",
            Memory::Gb8 => "8g",
        }
    }

    /// Human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            Memory::Mb512 => "512 MB",
            Memory::Gb1 => "1 GB",
            Memory::Gb2 => "2 GB",
            Memory::Gb4 => "4 GB",
            Memory::Gb8 => "8 GB",
        }
    }

    /// Parse the wire form.
    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|m| m.as_str() == s.trim().to_ascii_lowercase())
    }

    /// Next larger size, wrapping around.
    pub fn next(&self) -> Memory {
        let idx = Self::ALL.iter().position(|m| m == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }

    /// Next smaller size, wrapping around.
    pub fn prev(&self) -> Memory {
        let idx = Self::ALL.iter().position(|m| m == self).unwrap_or(0);
        Self::ALL[(idx + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

impl fmt::Display for Memory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// CPU cores allotted to a single worker.
///
/// Serialized as a bare integer. Only 1, 2, 3, 4, 6 and 8 are valid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(try_from = "u8", into = "u8")]
pub enum Cores {
    #[default]
    One,
    Two,
    Three,
    Four,
    Six,
    Eight,
}

impl Cores {
    /// All core counts in ascending order.
    pub const ALL: [Cores; 6] = [
        Cores::One,
        Cores::Two,
        Cores::Three,
        Cores::Four,
        Cores::Six,
        Cores::Eight,
    ];

    /// Numeric core count.
    pub fn count(&self) -> u8 {
        match self {
            Cores::One => 1,
            Cores::Two => 2,
            Cores::Three => 3,
            Cores::Four => 4,
            Cores::Six => 6,
            Cores::Eight => 8,
        }
    }

    /// Human-readable label ("1 Core", "4 Cores").
    pub fn label(&self) -> String {
        match self {
            Cores::One => "1 Core".to_string(),
            other => format!("{} Cores", other.count()),
        }
    }

    /// Next larger count, wrapping around.
    pub fn next(&self) -> Cores {
        let idx = Self::ALL.iter().position(|c| c == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }

    /// Next smaller count, wrapping around.
    pub fn prev(&self) -> Cores {
        let idx = Self::ALL.iter().position(|c| c == self).unwrap_or(0);
        Self::ALL[(idx + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

impl TryFrom<u8> for Cores {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::ALL
            .into_iter()
            .find(|c| c.count() == value)
            .ok_or_else(|| format!("unsupported core count {value}, expected one of 1, 2, 3, 4, 6, 8"))
    }
}

impl From<Cores> for u8 {
    fn from(cores: Cores) -> Self {
        cores.count()
    }
}

impl fmt::Display for Cores {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.count())
    }
}

/// Resources for one worker in the pool.
///
/// Has no identity of its own: its position in the draft is its label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct WorkerSpec {
    pub memory: Memory,
    pub cores: Cores,
}

impl WorkerSpec {
    pub fn new(memory: Memory, cores: Cores) -> Self {
        Self { memory, cores }
    }
}

/// Body of `POST /api/cluster/config`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplyConfigRequest {
    pub workers: Vec<WorkerSpec>,
}

/// A running worker as reported by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct WorkerEndpoint {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub ui_url: Option<String>,
}

/// Authoritative cluster state from `GET /api/cluster/status`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ClusterStatus {
    pub running: bool,
    #[serde(default)]
    pub worker_count: u32,
    #[serde(default)]
    pub master_url: Option<String>,
    #[serde(default)]
    pub master_ui_url: Option<String>,
    #[serde(default)]
    pub workers: Vec<WorkerEndpoint>,
}

/// A notebook hosted on the cluster. Identity is `id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotebookRecord {
    pub id: String,
    pub name: String,
    #[serde(default = "default_template")]
    pub template: String,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub path: Option<String>,
}

impl NotebookRecord {
    /// Creation time formatted for display.
    ///
    /// RFC 3339 timestamps are converted to local time; naive ISO-8601
    /// timestamps are shown as-is; anything else is returned verbatim.
    pub fn created_display(&self) -> String {
        if let Ok(dt) = DateTime::parse_from_rfc3339(&self.created_at) {
            return dt.with_timezone(&Local).format("%Y-%m-%d %H:%M:%S").to_string();
        }
        if let Ok(naive) = NaiveDateTime::parse_from_str(&self.created_at, "%Y-%m-%dT%H:%M:%S%.f") {
            return naive.format("%Y-%m-%d %H:%M:%S").to_string();
        }
        self.created_at.clone()
    }
}

fn default_template() -> String {
    "blank".to_string()
}

/// Body of `POST /api/notebooks/create`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateNotebookRequest {
    pub name: String,
    #[serde(default = "default_template")]
    pub template: String,
}

impl CreateNotebookRequest {
    pub fn new(name: impl Into<String>, template: impl Into<String>) -> Self {
        let template = template.into();
        Self {
            name: name.into(),
            template: if template.trim().is_empty() {
                default_template()
            } else {
                template
            },
        }
    }
}

/// Notification severity, determines visual treatment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    #[default]
    Info,
    Success,
    Error,
}

impl Severity {
    /// Icon prefix used when rendering.
    pub fn icon(&self) -> &'static str {
        match self {
            Severity::Info => "ℹ",
            Severity::Success => "✓",
            Severity::Error => "✗",
        }
    }
}

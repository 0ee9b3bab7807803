//! Error types for backend requests.

use serde_json::Value;
use thiserror::Error;

/// Backend request failure.
///
/// `Transport` and `Decode` mean no usable response reached the console.
/// `Rejected` carries the backend's own explanation of a non-success status.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// No response reached the console (connection refused, timeout, ...)
    #[error("{0}")]
    Transport(String),

    /// The backend answered with a non-success status
    #[error("HTTP {status}: {detail}")]
    Rejected { status: u16, detail: String },

    /// A success response whose body could not be parsed
    #[error("Invalid response: {0}")]
    Decode(String),

    /// The client could not be constructed
    #[error("Client configuration error: {0}")]
    Config(String),
}

/// Result type for backend requests.
pub type ApiResult<T> = std::result::Result<T, ApiError>;

impl ApiError {
    /// Build a `Rejected` error from an error response body.
    pub fn rejected(status: u16, body: &str) -> Self {
        Self::Rejected {
            status,
            detail: render_detail(status, body),
        }
    }

    /// True for application failures (the backend said no).
    pub fn is_rejected(&self) -> bool {
        matches!(self, Self::Rejected { .. })
    }

    /// True when no usable response was received.
    pub fn is_transport(&self) -> bool {
        !self.is_rejected()
    }

    /// Text suitable for an operator notification.
    ///
    /// For rejections this is the backend detail alone, without the status.
    pub fn detail(&self) -> String {
        match self {
            Self::Rejected { detail, .. } => detail.clone(),
            other => other.to_string(),
        }
    }

    /// HTTP status of a rejection.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Rejected { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::Decode(err.to_string())
        } else {
            Self::Transport(err.to_string())
        }
    }
}

/// Render the `detail` of an error body as readable text.
///
/// String details are returned verbatim. Structured details are serialized as
/// compact JSON. Bodies without a detail are serialized whole, non-JSON bodies
/// are returned as trimmed text, and an empty body becomes `HTTP <status>`.
pub fn render_detail(status: u16, body: &str) -> String {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return format!("HTTP {status}");
    }

    match serde_json::from_str::<Value>(trimmed) {
        Ok(Value::Object(map)) => match map.get("detail") {
            Some(Value::String(detail)) => detail.clone(),
            Some(Value::Null) | None => serde_json::to_string(&map).unwrap_or_default(),
            Some(detail) => detail.to_string(),
        },
        Ok(other) => other.to_string(),
        Err(_) => trimmed.to_string(),
    }
}

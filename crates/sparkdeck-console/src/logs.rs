//! Log tail view.
//!
//! Every successful poll replaces the buffer wholesale and moves the view to
//! the newest line. Lines are stored as inert text: terminal escape sequences
//! and control characters from the backend never reach the screen.

use std::sync::LazyLock;

use regex::Regex;
use tracing::warn;

/// Shown instead of an empty list.
pub const EMPTY_PLACEHOLDER: &str =
    "No logs yet. Logs will appear when you perform cluster operations.";

// CSI and OSC sequences plus lone two-byte escapes
const ANSI_PATTERN: &str = r"\x1b\[[0-?]*[ -/]*[@-~]|\x1b\][^\x07\x1b]*(?:\x07|\x1b\\)|\x1b[@-Z\\-_]";

static ANSI_ESCAPE: LazyLock<Option<Regex>> = LazyLock::new(|| match Regex::new(ANSI_PATTERN) {
    Ok(re) => Some(re),
    Err(e) => {
        warn!(error = %e, "escape pattern failed to compile, only control characters will be stripped");
        None
    }
});

/// Strip escape sequences and control characters from one log line.
pub fn sanitize_line(line: &str) -> String {
    let stripped = match ANSI_ESCAPE.as_ref() {
        Some(re) => re.replace_all(line, ""),
        None => line.into(),
    };
    stripped
        .chars()
        .map(|c| if c == '\t' { ' ' } else { c })
        .filter(|c| !c.is_control())
        .collect()
}

#[derive(Debug, Clone, Default)]
pub struct LogView {
    lines: Vec<String>,
    loaded: bool,
}

impl LogView {
    /// Replace the buffer with a freshly fetched one.
    pub fn replace(&mut self, lines: Vec<String>) {
        self.lines = lines.iter().map(|l| sanitize_line(l)).collect();
        self.loaded = true;
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Whether at least one poll has succeeded.
    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    /// The newest `height` lines, so the view always ends at the latest entry.
    pub fn tail(&self, height: usize) -> &[String] {
        let start = self.lines.len().saturating_sub(height);
        &self.lines[start..]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_pattern_compiles() {
        assert!(Regex::new(ANSI_PATTERN).is_ok());
        assert!(ANSI_ESCAPE.is_some());
    }

    #[test]
    fn test_sanitize_strips_ansi_and_controls() {
        assert_eq!(sanitize_line("\x1b[31mERROR\x1b[0m boom"), "ERROR boom");
        assert_eq!(sanitize_line("bell\x07 here\r"), "bell here");
        assert_eq!(sanitize_line("\x1b]0;title\x07text"), "text");
        assert_eq!(sanitize_line("a\tb"), "a b");
    }

    #[test]
    fn test_sanitize_keeps_markup_literal() {
        let line = "<script>alert('x')</script> & done";
        assert_eq!(sanitize_line(line), line);
    }

    #[test]
    fn test_replace_is_full_replacement() {
        let mut view = LogView::default();
        assert!(!view.is_loaded());

        view.replace(vec!["one".into(), "two".into(), "three".into()]);
        view.replace(vec!["four".into()]);
        assert_eq!(view.lines(), ["four".to_string()]);
        assert!(view.is_loaded());

        view.replace(Vec::new());
        assert!(view.is_empty());
    }

    #[test]
    fn test_tail_shows_newest() {
        let mut view = LogView::default();
        view.replace((1..=10).map(|n| format!("line {n}")).collect());

        let tail = view.tail(3);
        assert_eq!(tail.len(), 3);
        assert_eq!(tail[2], "line 10");
        assert_eq!(view.tail(50).len(), 10);
        assert!(view.tail(0).is_empty());
    }
}

//! Authoritative cluster status as last reported by the backend.

use std::time::{Duration, Instant};

use sparkdeck_core::ClusterStatus;

/// How long the refresh indicator spins after each poll attempt.
pub const SPIN_DURATION: Duration = Duration::from_millis(500);

/// Display state of the status indicator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Availability {
    /// No poll has succeeded yet
    Unknown,
    Online,
    Offline,
}

impl Availability {
    pub fn label(&self) -> &'static str {
        match self {
            Availability::Unknown => "Checking",
            Availability::Online => "Online",
            Availability::Offline => "Offline",
        }
    }
}

/// Status panel state.
///
/// A successful poll replaces the whole status. A failed poll leaves the
/// previous status on display.
#[derive(Debug, Clone, Default)]
pub struct StatusPanel {
    status: Option<ClusterStatus>,
    last_attempt: Option<Instant>,
    fallback_ui_url: Option<String>,
    failures: u32,
}

impl StatusPanel {
    pub fn new(fallback_ui_url: Option<String>) -> Self {
        Self {
            fallback_ui_url,
            ..Self::default()
        }
    }

    /// Record a poll attempt; restarts the refresh animation.
    pub fn begin_poll(&mut self, now: Instant) {
        self.last_attempt = Some(now);
    }

    pub fn apply(&mut self, status: ClusterStatus) {
        self.status = Some(status);
        self.failures = 0;
    }

    pub fn record_failure(&mut self) {
        self.failures = self.failures.saturating_add(1);
    }

    /// Consecutive failed polls since the last success.
    pub fn failures(&self) -> u32 {
        self.failures
    }

    pub fn status(&self) -> Option<&ClusterStatus> {
        self.status.as_ref()
    }

    pub fn availability(&self) -> Availability {
        match &self.status {
            None => Availability::Unknown,
            Some(s) if s.running => Availability::Online,
            Some(_) => Availability::Offline,
        }
    }

    pub fn is_online(&self) -> bool {
        self.availability() == Availability::Online
    }

    /// Authoritative worker count, never the draft length.
    pub fn worker_count(&self) -> Option<u32> {
        self.status.as_ref().map(|s| s.worker_count)
    }

    /// The cluster's primary UI, available only while online.
    pub fn master_ui_link(&self) -> Option<&str> {
        let status = self.status.as_ref().filter(|s| s.running)?;
        status
            .master_ui_url
            .as_deref()
            .filter(|url| !url.is_empty())
            .or(self.fallback_ui_url.as_deref())
    }

    pub fn is_spinning(&self, now: Instant) -> bool {
        self.last_attempt
            .is_some_and(|at| now.saturating_duration_since(at) < SPIN_DURATION)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn online(count: u32) -> ClusterStatus {
        ClusterStatus {
            running: true,
            worker_count: count,
            master_ui_url: Some("http://localhost:8080".to_string()),
            ..ClusterStatus::default()
        }
    }

    #[test]
    fn test_unknown_until_first_success() {
        let mut panel = StatusPanel::default();
        assert_eq!(panel.availability(), Availability::Unknown);
        panel.record_failure();
        assert_eq!(panel.availability(), Availability::Unknown);
        assert_eq!(panel.worker_count(), None);
    }

    #[test]
    fn test_failure_keeps_previous_status() {
        let mut panel = StatusPanel::default();
        panel.apply(online(3));
        panel.record_failure();
        panel.record_failure();

        assert_eq!(panel.availability(), Availability::Online);
        assert_eq!(panel.worker_count(), Some(3));
        assert_eq!(panel.failures(), 2);

        panel.apply(ClusterStatus::default());
        assert_eq!(panel.availability(), Availability::Offline);
        assert_eq!(panel.worker_count(), Some(0));
        assert_eq!(panel.failures(), 0);
    }

    #[test]
    fn test_master_link_disabled_offline() {
        let mut panel = StatusPanel::new(Some("http://fallback:8080".to_string()));
        assert_eq!(panel.master_ui_link(), None);

        panel.apply(ClusterStatus::default());
        assert_eq!(panel.master_ui_link(), None);

        panel.apply(online(1));
        assert_eq!(panel.master_ui_link(), Some("http://localhost:8080"));

        panel.apply(ClusterStatus {
            running: true,
            ..ClusterStatus::default()
        });
        assert_eq!(panel.master_ui_link(), Some("http://fallback:8080"));
    }

    #[test]
    fn test_spinner_window() {
        let mut panel = StatusPanel::default();
        let t0 = Instant::now();
        assert!(!panel.is_spinning(t0));

        panel.begin_poll(t0);
        assert!(panel.is_spinning(t0 + Duration::from_millis(499)));
        assert!(!panel.is_spinning(t0 + SPIN_DURATION));
    }
}

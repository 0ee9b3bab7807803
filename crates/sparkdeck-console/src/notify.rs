//! Transient operator notifications.
//!
//! Each notification follows its own lifecycle, measured from creation:
//!
//! - **Entering**: created, not yet shown (`enter` window)
//! - **Visible**: shown until `visible` has elapsed since creation
//! - **Leaving**: hidden, exit transition running (`exit` window)
//! - removed once the exit transition ends
//!
//! Lifecycles never interact, so any number of notifications can stack.

use std::time::{Duration, Instant};

use sparkdeck_core::Severity;
use sparkdeck_core::config::NotificationConfig;

/// Lifecycle phase of a notification at a point in time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Entering,
    Visible,
    Leaving,
    Expired,
}

/// Phase durations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timings {
    pub enter: Duration,
    pub visible: Duration,
    pub exit: Duration,
}

impl Default for Timings {
    fn default() -> Self {
        Self::from(&NotificationConfig::default())
    }
}

impl From<&NotificationConfig> for Timings {
    fn from(config: &NotificationConfig) -> Self {
        Self {
            enter: Duration::from_millis(config.enter_ms),
            visible: Duration::from_millis(config.visible_ms),
            exit: Duration::from_millis(config.exit_ms),
        }
    }
}

/// A single notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub id: u64,
    pub severity: Severity,
    pub text: String,
    pub created_at: Instant,
}

impl Notification {
    /// Phase of this notification at `now`.
    pub fn phase(&self, now: Instant, timings: &Timings) -> Phase {
        let age = now.saturating_duration_since(self.created_at);
        let shown_at = timings.enter;
        let hidden_at = timings.visible.max(shown_at);
        let removed_at = hidden_at + timings.exit;

        if age < shown_at {
            Phase::Entering
        } else if age < hidden_at {
            Phase::Visible
        } else if age < removed_at {
            Phase::Leaving
        } else {
            Phase::Expired
        }
    }

    /// One-line rendering: severity icon followed by the text.
    pub fn format_compact(&self) -> String {
        format!("{} {}", self.severity.icon(), self.text)
    }
}

/// Append-only stack of notifications, oldest first.
#[derive(Debug, Clone, Default)]
pub struct NotificationCenter {
    items: Vec<Notification>,
    next_id: u64,
    timings: Timings,
}

impl NotificationCenter {
    pub fn new(timings: Timings) -> Self {
        Self {
            items: Vec::new(),
            next_id: 1,
            timings,
        }
    }

    pub fn timings(&self) -> &Timings {
        &self.timings
    }

    /// Add a notification and return its id.
    pub fn push(&mut self, severity: Severity, text: impl Into<String>, now: Instant) -> u64 {
        let id = self.next_id.max(1);
        self.next_id = id + 1;
        let text = text.into();
        tracing::debug!(id, ?severity, text = %text, "notification");
        self.items.push(Notification {
            id,
            severity,
            text,
            created_at: now,
        });
        id
    }

    /// Drop notifications whose exit transition has finished.
    pub fn tick(&mut self, now: Instant) {
        let timings = self.timings;
        self.items
            .retain(|n| n.phase(now, &timings) != Phase::Expired);
    }

    /// Every notification still on the surface, with its phase.
    pub fn entries(&self, now: Instant) -> impl Iterator<Item = (&Notification, Phase)> {
        let timings = self.timings;
        self.items
            .iter()
            .map(move |n| (n, n.phase(now, &timings)))
            .filter(|(_, phase)| *phase != Phase::Expired)
    }

    /// Notifications currently shown to the operator.
    pub fn visible(&self, now: Instant) -> Vec<&Notification> {
        self.entries(now)
            .filter(|(_, phase)| *phase == Phase::Visible)
            .map(|(n, _)| n)
            .collect()
    }

    /// Most recent notification, regardless of phase.
    pub fn latest(&self) -> Option<&Notification> {
        self.items.last()
    }

    /// Every notification not yet removed.
    pub fn all(&self) -> &[Notification] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

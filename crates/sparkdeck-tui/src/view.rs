//! Panel focus and table navigation.

use std::fmt;

/// Panels that can hold keyboard focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FocusPanel {
    /// Worker draft table
    #[default]
    Workers,
    /// Notebook list
    Notebooks,
    /// Log tail
    Logs,
}

impl FocusPanel {
    /// All panels in Tab order.
    pub const ALL: [FocusPanel; 3] = [FocusPanel::Workers, FocusPanel::Notebooks, FocusPanel::Logs];

    pub fn title(&self) -> &'static str {
        match self {
            FocusPanel::Workers => "Worker Configuration",
            FocusPanel::Notebooks => "Notebooks",
            FocusPanel::Logs => "Cluster Logs",
        }
    }

    pub fn next(&self) -> FocusPanel {
        let idx = Self::ALL.iter().position(|p| p == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }

    pub fn prev(&self) -> FocusPanel {
        let idx = Self::ALL.iter().position(|p| p == self).unwrap_or(0);
        Self::ALL[(idx + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

impl fmt::Display for FocusPanel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.title())
    }
}

/// Editable column of the worker table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Column {
    #[default]
    Memory,
    Cores,
}

impl Column {
    pub fn toggle(&self) -> Column {
        match self {
            Column::Memory => Column::Cores,
            Column::Cores => Column::Memory,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_focus_cycles_both_ways() {
        let mut focus = FocusPanel::default();
        for _ in 0..FocusPanel::ALL.len() {
            focus = focus.next();
        }
        assert_eq!(focus, FocusPanel::Workers);

        assert_eq!(FocusPanel::Workers.prev(), FocusPanel::Logs);
        assert_eq!(FocusPanel::Logs.next(), FocusPanel::Workers);
    }

    #[test]
    fn test_column_toggle() {
        assert_eq!(Column::Memory.toggle(), Column::Cores);
        assert_eq!(Column::Cores.toggle().toggle(), Column::Cores);
    }
}

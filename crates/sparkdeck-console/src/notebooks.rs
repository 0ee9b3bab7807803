//! Notebook registry as last listed by the backend.
//!
//! Records only appear or disappear through a fresh list; there is no local
//! insert or removal.

use sparkdeck_core::NotebookRecord;

pub const EMPTY_MESSAGE: &str = "No notebooks created yet.";

#[derive(Debug, Clone, Default)]
pub struct NotebookPanel {
    notebooks: Vec<NotebookRecord>,
    selected: usize,
    loaded: bool,
}

impl NotebookPanel {
    /// Replace the list, keeping the selection on the same id when it survives.
    pub fn replace(&mut self, notebooks: Vec<NotebookRecord>) {
        let selected_id = self.selected().map(|nb| nb.id.clone());
        self.notebooks = notebooks;
        self.loaded = true;

        self.selected = selected_id
            .and_then(|id| self.notebooks.iter().position(|nb| nb.id == id))
            .unwrap_or(self.selected)
            .min(self.notebooks.len().saturating_sub(1));
    }

    pub fn notebooks(&self) -> &[NotebookRecord] {
        &self.notebooks
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    pub fn is_empty(&self) -> bool {
        self.notebooks.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.notebooks.iter().any(|nb| nb.id == id)
    }

    pub fn selected_index(&self) -> usize {
        self.selected
    }

    pub fn selected(&self) -> Option<&NotebookRecord> {
        self.notebooks.get(self.selected)
    }

    pub fn select_next(&mut self) {
        if self.selected + 1 < self.notebooks.len() {
            self.selected += 1;
        }
    }

    pub fn select_prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }
}

/// Secondary line shown under a notebook name.
pub fn meta_line(notebook: &NotebookRecord) -> String {
    format!(
        "Template: {} • Created: {}",
        notebook.template,
        notebook.created_display()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: &str) -> NotebookRecord {
        NotebookRecord {
            id: id.to_string(),
            name: id.to_string(),
            template: "blank".to_string(),
            created_at: "2024-01-15T10:30:00".to_string(),
            path: None,
        }
    }

    #[test]
    fn test_selection_follows_id() {
        let mut panel = NotebookPanel::default();
        panel.replace(vec![record("a"), record("b"), record("c")]);
        panel.select_next();
        panel.select_next();
        assert_eq!(panel.selected().unwrap().id, "c");

        panel.replace(vec![record("c"), record("d")]);
        assert_eq!(panel.selected().unwrap().id, "c");
    }

    #[test]
    fn test_selection_clamped_when_row_removed() {
        let mut panel = NotebookPanel::default();
        panel.replace(vec![record("a"), record("b")]);
        panel.select_next();
        panel.replace(vec![record("a")]);
        assert_eq!(panel.selected_index(), 0);

        panel.replace(Vec::new());
        assert!(panel.selected().is_none());
        assert!(panel.is_empty());
        panel.select_next();
        assert_eq!(panel.selected_index(), 0);
    }

    #[test]
    fn test_meta_line() {
        assert_eq!(
            meta_line(&record("etl")),
            "Template: blank • Created: 2024-01-15 10:30:00"
        );
    }
}

//! Modal surfaces: the notebook creation dialog and confirmation prompts.
//!
//! Each modal is a plain open/closed toggle. Nothing queues or nests.

use sparkdeck_core::CreateNotebookRequest;

/// Template used when the operator leaves the field empty.
pub const DEFAULT_TEMPLATE: &str = "blank";

/// Input field of the notebook dialog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DialogField {
    #[default]
    Name,
    Template,
}

impl DialogField {
    pub fn next(&self) -> Self {
        match self {
            DialogField::Name => DialogField::Template,
            DialogField::Template => DialogField::Name,
        }
    }
}

/// The create-notebook dialog.
///
/// Entered values survive a failed submission so the operator can correct
/// and resubmit; they are cleared only after a successful create.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotebookDialog {
    open: bool,
    pub name: String,
    pub template: String,
    pub field: DialogField,
}

impl Default for NotebookDialog {
    fn default() -> Self {
        Self {
            open: false,
            name: String::new(),
            template: DEFAULT_TEMPLATE.to_string(),
            field: DialogField::Name,
        }
    }
}

impl NotebookDialog {
    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn show(&mut self) {
        self.open = true;
    }

    /// Close the dialog, keeping entered values.
    pub fn hide(&mut self) {
        self.open = false;
    }

    /// Reset the form to its initial values.
    pub fn reset(&mut self) {
        self.name.clear();
        self.template = DEFAULT_TEMPLATE.to_string();
        self.field = DialogField::Name;
    }

    /// The field currently receiving input.
    pub fn focused_mut(&mut self) -> &mut String {
        match self.field {
            DialogField::Name => &mut self.name,
            DialogField::Template => &mut self.template,
        }
    }

    /// Build the request from the current form, or `None` when the name is blank.
    pub fn request(&self) -> Option<CreateNotebookRequest> {
        let name = self.name.trim();
        if name.is_empty() {
            return None;
        }
        Some(CreateNotebookRequest::new(name, self.template.trim()))
    }
}

/// Operations gated behind an explicit yes/no.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Confirmation {
    StopCluster,
    DeleteNotebook { id: String },
}

impl Confirmation {
    pub fn prompt(&self) -> &'static str {
        match self {
            Confirmation::StopCluster => "Are you sure you want to stop the Spark cluster?",
            Confirmation::DeleteNotebook { .. } => "Are you sure you want to delete this notebook?",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dialog_toggle_keeps_values() {
        let mut dialog = NotebookDialog::default();
        assert!(!dialog.is_open());

        dialog.show();
        dialog.name.push_str("etl");
        dialog.hide();
        assert!(!dialog.is_open());
        assert_eq!(dialog.name, "etl");

        dialog.reset();
        assert!(dialog.name.is_empty());
        assert_eq!(dialog.template, DEFAULT_TEMPLATE);
    }

    #[test]
    fn test_request_requires_name() {
        let mut dialog = NotebookDialog::default();
        dialog.name = "   ".to_string();
        assert!(dialog.request().is_none());

        dialog.name = " etl ".to_string();
        dialog.template = String::new();
        let request = dialog.request().unwrap();
        assert_eq!(request.name, "etl");
        assert_eq!(request.template, "blank");
    }

    #[test]
    fn test_focused_field_cycles() {
        let mut dialog = NotebookDialog::default();
        dialog.focused_mut().push('a');
        dialog.field = dialog.field.next();
        dialog.focused_mut().clear();
        dialog.focused_mut().push_str("pyspark");

        assert_eq!(dialog.name, "a");
        assert_eq!(dialog.template, "pyspark");
        assert_eq!(dialog.field.next(), DialogField::Name);
    }
}

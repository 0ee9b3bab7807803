//! Keyboard input handling.
//!
//! Keys map to [`AppEvent`]s according to the current [`InputMode`]: a modal
//! (confirmation or notebook dialog) captures every key except Ctrl+C.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Application-level events.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    /// Request application quit
    Quit,
    /// Force quit (Ctrl+C)
    ForceQuit,
    /// Show help overlay
    ShowHelp,
    /// Focus next panel
    FocusNext,
    /// Focus previous panel
    FocusPrev,
    NavigateUp,
    NavigateDown,
    NavigateLeft,
    NavigateRight,
    /// Cycle the focused worker value forward
    CycleNext,
    /// Cycle the focused worker value backward
    CyclePrev,
    AddWorker,
    /// Remove the focused worker or delete the selected notebook
    Remove,
    Apply,
    Start,
    Stop,
    NewNotebook,
    /// Open the selected notebook
    Select,
    OpenMasterUi,
    ClearLogs,
    Refresh,
    /// Answer yes to the confirmation prompt
    Confirm,
    /// Answer no to the confirmation prompt
    Decline,
    /// Close the notebook dialog
    Cancel,
    /// Text input character
    TextInput(char),
    /// Backspace in text input
    Backspace,
    /// Move to the next dialog field
    NextField,
    /// Submit the notebook dialog
    Submit,
    /// No action needed
    None,
}

/// Which surface receives keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputMode {
    #[default]
    Normal,
    /// Notebook creation dialog is open
    Dialog,
    /// A yes/no prompt is open
    Confirm,
}

/// Converts key events to app events.
#[derive(Debug, Default)]
pub struct InputHandler {
    mode: InputMode,
}

impl InputHandler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_mode(&mut self, mode: InputMode) {
        self.mode = mode;
    }

    pub fn mode(&self) -> InputMode {
        self.mode
    }

    /// Handle a key event and return the corresponding app event.
    pub fn handle_key(&mut self, key: KeyEvent) -> AppEvent {
        // Ctrl+C always force quits
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return AppEvent::ForceQuit;
        }

        match self.mode {
            InputMode::Confirm => Self::handle_confirm(key),
            InputMode::Dialog => Self::handle_dialog(key),
            InputMode::Normal => Self::handle_normal(key),
        }
    }

    fn handle_confirm(key: KeyEvent) -> AppEvent {
        match key.code {
            KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => AppEvent::Confirm,
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => AppEvent::Decline,
            _ => AppEvent::None,
        }
    }

    fn handle_dialog(key: KeyEvent) -> AppEvent {
        match key.code {
            KeyCode::Esc => AppEvent::Cancel,
            KeyCode::Enter => AppEvent::Submit,
            KeyCode::Tab | KeyCode::BackTab => AppEvent::NextField,
            KeyCode::Backspace => AppEvent::Backspace,
            KeyCode::Char(c) => AppEvent::TextInput(c),
            _ => AppEvent::None,
        }
    }

    fn handle_normal(key: KeyEvent) -> AppEvent {
        match key.code {
            KeyCode::Char('q') | KeyCode::Char('Q') => AppEvent::Quit,
            KeyCode::Char('?') => AppEvent::ShowHelp,

            // Panel focus
            KeyCode::Tab => {
                if key.modifiers.contains(KeyModifiers::SHIFT) {
                    AppEvent::FocusPrev
                } else {
                    AppEvent::FocusNext
                }
            }
            KeyCode::BackTab => AppEvent::FocusPrev,

            // Table navigation
            KeyCode::Up | KeyCode::Char('k') => AppEvent::NavigateUp,
            KeyCode::Down | KeyCode::Char('j') => AppEvent::NavigateDown,
            KeyCode::Left | KeyCode::Char('h') => AppEvent::NavigateLeft,
            KeyCode::Right | KeyCode::Char('l') => AppEvent::NavigateRight,
            KeyCode::Char('+') | KeyCode::Char('=') | KeyCode::Char(' ') => AppEvent::CycleNext,
            KeyCode::Char('-') | KeyCode::Backspace => AppEvent::CyclePrev,

            // Draft
            KeyCode::Char('a') => AppEvent::AddWorker,
            KeyCode::Char('d') | KeyCode::Delete => AppEvent::Remove,
            KeyCode::Char('A') => AppEvent::Apply,

            // Cluster lifecycle
            KeyCode::Char('s') => AppEvent::Start,
            KeyCode::Char('S') => AppEvent::Stop,
            KeyCode::Char('m') | KeyCode::Char('M') => AppEvent::OpenMasterUi,
            KeyCode::Char('c') | KeyCode::Char('C') => AppEvent::ClearLogs,
            KeyCode::Char('r') | KeyCode::Char('R') => AppEvent::Refresh,

            // Notebooks
            KeyCode::Char('n') | KeyCode::Char('N') => AppEvent::NewNotebook,
            KeyCode::Enter => AppEvent::Select,

            _ => AppEvent::None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key_event(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn key_event_with_mods(code: KeyCode, mods: KeyModifiers) -> KeyEvent {
        KeyEvent::new(code, mods)
    }

    #[test]
    fn test_lifecycle_hotkeys() {
        let mut handler = InputHandler::new();
        assert_eq!(handler.handle_key(key_event(KeyCode::Char('s'))), AppEvent::Start);
        assert_eq!(
            handler.handle_key(key_event_with_mods(KeyCode::Char('S'), KeyModifiers::SHIFT)),
            AppEvent::Stop
        );
        assert_eq!(
            handler.handle_key(key_event_with_mods(KeyCode::Char('A'), KeyModifiers::SHIFT)),
            AppEvent::Apply
        );
        assert_eq!(handler.handle_key(key_event(KeyCode::Char('a'))), AppEvent::AddWorker);
        assert_eq!(handler.handle_key(key_event(KeyCode::Char('c'))), AppEvent::ClearLogs);
    }

    #[test]
    fn test_value_cycling_keys() {
        let mut handler = InputHandler::new();
        assert_eq!(handler.handle_key(key_event(KeyCode::Char('+'))), AppEvent::CycleNext);
        assert_eq!(handler.handle_key(key_event(KeyCode::Char(' '))), AppEvent::CycleNext);
        assert_eq!(handler.handle_key(key_event(KeyCode::Char('-'))), AppEvent::CyclePrev);
        assert_eq!(handler.handle_key(key_event(KeyCode::Backspace)), AppEvent::CyclePrev);
        assert_eq!(handler.handle_key(key_event(KeyCode::Left)), AppEvent::NavigateLeft);
    }

    #[test]
    fn test_tab_focus() {
        let mut handler = InputHandler::new();
        assert_eq!(handler.handle_key(key_event(KeyCode::Tab)), AppEvent::FocusNext);
        assert_eq!(handler.handle_key(key_event(KeyCode::BackTab)), AppEvent::FocusPrev);
        assert_eq!(
            handler.handle_key(key_event_with_mods(KeyCode::Tab, KeyModifiers::SHIFT)),
            AppEvent::FocusPrev
        );
    }

    #[test]
    fn test_confirm_mode_captures_keys() {
        let mut handler = InputHandler::new();
        handler.set_mode(InputMode::Confirm);

        assert_eq!(handler.handle_key(key_event(KeyCode::Char('y'))), AppEvent::Confirm);
        assert_eq!(handler.handle_key(key_event(KeyCode::Char('n'))), AppEvent::Decline);
        assert_eq!(handler.handle_key(key_event(KeyCode::Esc)), AppEvent::Decline);
        // Hotkeys are inert while a prompt is open
        assert_eq!(handler.handle_key(key_event(KeyCode::Char('q'))), AppEvent::None);
        assert_eq!(handler.handle_key(key_event(KeyCode::Char('s'))), AppEvent::None);
    }

    #[test]
    fn test_dialog_mode_is_text_entry() {
        let mut handler = InputHandler::new();
        handler.set_mode(InputMode::Dialog);

        assert_eq!(handler.handle_key(key_event(KeyCode::Char('q'))), AppEvent::TextInput('q'));
        assert_eq!(handler.handle_key(key_event(KeyCode::Backspace)), AppEvent::Backspace);
        assert_eq!(handler.handle_key(key_event(KeyCode::Tab)), AppEvent::NextField);
        assert_eq!(handler.handle_key(key_event(KeyCode::Enter)), AppEvent::Submit);
        assert_eq!(handler.handle_key(key_event(KeyCode::Esc)), AppEvent::Cancel);
    }

    #[test]
    fn test_ctrl_c_always_quits() {
        let mut handler = InputHandler::new();
        for mode in [InputMode::Normal, InputMode::Dialog, InputMode::Confirm] {
            handler.set_mode(mode);
            assert_eq!(
                handler.handle_key(key_event_with_mods(KeyCode::Char('c'), KeyModifiers::CONTROL)),
                AppEvent::ForceQuit
            );
        }
    }
}

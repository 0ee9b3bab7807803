//! Main application state and event loop for the sparkdeck TUI.
//!
//! The `App` wraps a [`Console`] with terminal-only state (focus, table
//! cursor, help overlay) and translates key presses into console actions.
//! Rendering is a pure function of that state.

use std::io;
use std::time::{Duration, Instant};

use crossterm::event::{Event, EventStream, KeyEvent, KeyEventKind};
use futures_util::StreamExt;
use ratatui::{
    Frame, Terminal,
    backend::{Backend, CrosstermBackend},
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap},
};
use tokio::sync::mpsc::UnboundedReceiver;
use tracing::{debug, info, warn};

use sparkdeck_console::logs::EMPTY_PLACEHOLDER;
use sparkdeck_console::notebooks::{EMPTY_MESSAGE, meta_line};
use sparkdeck_console::{Action, Console, DialogEdit, Effect, Message, Runtime, WorkerField};
use sparkdeck_core::config::PollingConfig;
use sparkdeck_core::{DeckError, Result};

use crate::event::{AppEvent, InputHandler, InputMode};
use crate::theme::Theme;
use crate::view::{Column, FocusPanel};
use crate::widget;

/// Redraw rate for spinners and notification expiry.
const FRAME_DURATION: Duration = Duration::from_millis(100);

/// Main application state.
pub struct App {
    console: Console,
    /// Base URL shown in the header
    api_base: String,
    /// Panel with keyboard focus
    focus: FocusPanel,
    /// Worker table cursor
    cursor: usize,
    /// Worker table column
    column: Column,
    input_handler: InputHandler,
    theme: Theme,
    should_quit: bool,
    show_help: bool,
}

impl App {
    pub fn new(console: Console, api_base: impl Into<String>) -> Self {
        Self {
            console,
            api_base: api_base.into(),
            focus: FocusPanel::default(),
            cursor: 0,
            column: Column::default(),
            input_handler: InputHandler::new(),
            theme: Theme::default(),
            should_quit: false,
            show_help: false,
        }
    }

    pub fn console(&self) -> &Console {
        &self.console
    }

    pub fn focus(&self) -> FocusPanel {
        self.focus
    }

    pub fn cursor(&self) -> (usize, Column) {
        (self.cursor, self.column)
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub fn show_help(&self) -> bool {
        self.show_help
    }

    /// Input mode implied by the console's open modals.
    fn input_mode(&self) -> InputMode {
        if self.console.confirmation().is_some() {
            InputMode::Confirm
        } else if self.console.dialog().is_open() {
            InputMode::Dialog
        } else {
            InputMode::Normal
        }
    }

    /// Handle a key press and return the effects to execute.
    pub fn handle_key_event(&mut self, key: KeyEvent, now: Instant) -> Vec<Effect> {
        // Any key closes the help overlay
        if self.show_help {
            self.show_help = false;
            return Vec::new();
        }
        self.input_handler.set_mode(self.input_mode());
        let event = self.input_handler.handle_key(key);
        self.handle_app_event(event, now)
    }

    /// Handle an application event.
    pub fn handle_app_event(&mut self, event: AppEvent, now: Instant) -> Vec<Effect> {
        let action = match event {
            AppEvent::Quit | AppEvent::ForceQuit => {
                self.should_quit = true;
                None
            }
            AppEvent::ShowHelp => {
                self.show_help = true;
                None
            }
            AppEvent::FocusNext => {
                self.focus = self.focus.next();
                None
            }
            AppEvent::FocusPrev => {
                self.focus = self.focus.prev();
                None
            }
            AppEvent::NavigateUp => {
                self.navigate(-1);
                None
            }
            AppEvent::NavigateDown => {
                self.navigate(1);
                None
            }
            AppEvent::NavigateLeft | AppEvent::NavigateRight => {
                if self.focus == FocusPanel::Workers {
                    self.column = self.column.toggle();
                }
                None
            }
            AppEvent::CycleNext => self.cycle(true),
            AppEvent::CyclePrev => self.cycle(false),
            AppEvent::AddWorker => Some(Action::AddWorker),
            AppEvent::Remove => match self.focus {
                FocusPanel::Workers => Some(Action::RemoveWorker {
                    position: self.cursor,
                }),
                FocusPanel::Notebooks => self
                    .console
                    .notebooks()
                    .selected()
                    .map(|nb| Action::DeleteNotebook { id: nb.id.clone() }),
                FocusPanel::Logs => None,
            },
            AppEvent::Apply => Some(Action::ApplyConfig),
            AppEvent::Start => Some(Action::StartCluster),
            AppEvent::Stop => Some(Action::StopCluster),
            AppEvent::NewNotebook => Some(Action::ShowCreateNotebook),
            AppEvent::Select => match self.focus {
                FocusPanel::Notebooks => self
                    .console
                    .notebooks()
                    .selected()
                    .map(|nb| Action::OpenNotebook { id: nb.id.clone() }),
                _ => None,
            },
            AppEvent::OpenMasterUi => Some(Action::OpenMasterUi),
            AppEvent::ClearLogs => Some(Action::ClearLogs),
            AppEvent::Refresh => Some(Action::RefreshAll),
            AppEvent::Confirm => Some(Action::Confirm),
            AppEvent::Decline => Some(Action::Decline),
            AppEvent::Cancel => Some(Action::HideCreateNotebook),
            AppEvent::TextInput(c) => Some(Action::EditDialog(DialogEdit::Insert(c))),
            AppEvent::Backspace => Some(Action::EditDialog(DialogEdit::Backspace)),
            AppEvent::NextField => Some(Action::EditDialog(DialogEdit::NextField)),
            AppEvent::Submit => Some(Action::SubmitNotebook),
            AppEvent::None => None,
        };

        let effects = match action {
            Some(action) => {
                debug!(?action, "dispatching");
                self.console.dispatch(action, now)
            }
            None => Vec::new(),
        };
        self.clamp_cursor();
        effects
    }

    /// Feed a runtime message into the console.
    pub fn handle_message(&mut self, message: Message, now: Instant) -> Vec<Effect> {
        let effects = self.console.handle(message, now);
        self.clamp_cursor();
        effects
    }

    fn navigate(&mut self, delta: isize) {
        match self.focus {
            FocusPanel::Workers => {
                self.cursor = self.cursor.saturating_add_signed(delta);
                self.clamp_cursor();
            }
            FocusPanel::Notebooks => {
                let notebooks = self.console.notebooks_mut();
                if delta < 0 {
                    notebooks.select_prev();
                } else {
                    notebooks.select_next();
                }
            }
            FocusPanel::Logs => {}
        }
    }

    /// Build the update for the focused worker cell.
    fn cycle(&self, forward: bool) -> Option<Action> {
        if self.focus != FocusPanel::Workers {
            return None;
        }
        let worker = self.console.draft().get(self.cursor)?;
        let field = match (self.column, forward) {
            (Column::Memory, true) => WorkerField::Memory(worker.memory.next()),
            (Column::Memory, false) => WorkerField::Memory(worker.memory.prev()),
            (Column::Cores, true) => WorkerField::Cores(worker.cores.next()),
            (Column::Cores, false) => WorkerField::Cores(worker.cores.prev()),
        };
        Some(Action::UpdateWorker {
            position: self.cursor,
            field,
        })
    }

    fn clamp_cursor(&mut self) {
        let last = self.console.draft().len().saturating_sub(1);
        self.cursor = self.cursor.min(last);
    }

    // ============================================================
    // Event loop
    // ============================================================

    /// Run the console until the operator quits.
    ///
    /// Takes over the terminal, starts the pollers and restores the terminal
    /// on every exit path.
    pub async fn run(
        &mut self,
        runtime: Runtime,
        rx: UnboundedReceiver<Message>,
        polling: &PollingConfig,
    ) -> Result<()> {
        let mut terminal = setup_terminal()?;
        let result = self.run_loop(&mut terminal, &runtime, rx, polling).await;
        let restored = restore_terminal(&mut terminal);
        result.and(restored)
    }

    async fn run_loop<B: Backend>(
        &mut self,
        terminal: &mut Terminal<B>,
        runtime: &Runtime,
        mut rx: UnboundedReceiver<Message>,
        polling: &PollingConfig,
    ) -> Result<()> {
        let pollers = runtime.spawn_pollers(polling);
        runtime.execute(self.console.startup());
        info!(api = %self.api_base, "console started");

        let mut events = EventStream::new();
        let mut frame_tick = tokio::time::interval(FRAME_DURATION);

        while !self.should_quit {
            terminal
                .draw(|frame| self.draw(frame, Instant::now()))
                .map_err(|e| DeckError::internal(format!("Failed to draw frame: {e}")))?;

            tokio::select! {
                Some(message) = rx.recv() => {
                    let effects = self.handle_message(message, Instant::now());
                    runtime.execute(effects);
                }
                maybe_event = events.next() => match maybe_event {
                    Some(Ok(Event::Key(key))) if key.kind == KeyEventKind::Press => {
                        let effects = self.handle_key_event(key, Instant::now());
                        runtime.execute(effects);
                    }
                    Some(Ok(_)) => {}
                    Some(Err(e)) => warn!(error = %e, "terminal event error"),
                    None => break,
                },
                _ = frame_tick.tick() => {
                    let effects = self.console.dispatch(Action::Tick, Instant::now());
                    runtime.execute(effects);
                }
            }
        }

        pollers.shutdown();
        info!("console stopped");
        Ok(())
    }

    // ============================================================
    // Rendering
    // ============================================================

    /// Draw the UI.
    pub fn draw(&self, frame: &mut Frame, now: Instant) {
        let area = frame.area();

        // Main layout: header, content, footer
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Header
                Constraint::Min(8),    // Content
                Constraint::Length(2), // Footer
            ])
            .split(area);

        self.draw_header(frame, chunks[0], now);
        self.draw_content(frame, chunks[1]);
        self.draw_footer(frame, chunks[2]);

        widget::render_notifications(frame, area, self.console.notifications(), now, &self.theme);

        if let Some(confirmation) = self.console.confirmation() {
            widget::render_confirm(frame, area, confirmation, &self.theme);
        } else if self.console.dialog().is_open() {
            widget::render_dialog(frame, area, self.console.dialog(), &self.theme);
        }
        if let Some(pending) = self.console.pending() {
            widget::render_loading(frame, area, pending, now, &self.theme);
        }
        if self.show_help {
            self.draw_help_overlay(frame, area);
        }
    }

    fn draw_header(&self, frame: &mut Frame, area: Rect, now: Instant) {
        let colors = &self.theme.colors;
        let status = self.console.status();
        let availability = status.availability();
        let badge_color = self.theme.availability_color(availability);

        let workers = status
            .worker_count()
            .map_or_else(|| "-".to_string(), |n| n.to_string());
        let spinner = if status.is_spinning(now) { "⟳" } else { " " };

        let left = vec![
            Span::styled(
                " sparkdeck ",
                Style::default().fg(colors.header).add_modifier(Modifier::BOLD),
            ),
            Span::raw(" "),
            Span::styled(
                format!("● {}", availability.label()),
                Style::default().fg(badge_color).add_modifier(Modifier::BOLD),
            ),
            Span::raw("  "),
            Span::styled("Workers: ", Style::default().fg(colors.text_dim)),
            Span::styled(workers, Style::default().fg(colors.text)),
            Span::raw(" "),
            Span::styled(spinner, Style::default().fg(colors.header)),
        ];
        let left_len: usize = left.iter().map(|s| s.content.chars().count()).sum();
        let right = self.api_base.clone();
        let spacing = (area.width as usize).saturating_sub(left_len + right.chars().count() + 3);

        let mut spans = left;
        spans.push(Span::raw(" ".repeat(spacing)));
        spans.push(Span::styled(right, Style::default().fg(colors.text_dim)));

        let header = Paragraph::new(Line::from(spans)).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(colors.border_dim)),
        );
        frame.render_widget(header, area);
    }

    fn draw_content(&self, frame: &mut Frame, area: Rect) {
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
            .split(area);

        let workers_height = widget::worker_table_height(self.console.draft().len());
        let left = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(workers_height), Constraint::Min(5)])
            .split(columns[0]);

        let table = widget::worker_table(
            self.console.draft(),
            self.cursor,
            self.column,
            self.focus == FocusPanel::Workers,
            &self.theme,
        );
        frame.render_widget(table, left[0]);
        self.draw_notebooks(frame, left[1]);
        self.draw_logs(frame, columns[1]);
    }

    fn draw_notebooks(&self, frame: &mut Frame, area: Rect) {
        let focused = self.focus == FocusPanel::Notebooks;
        let colors = &self.theme.colors;
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(self.theme.border(focused))
            .title(Span::styled(format!(" {} ", FocusPanel::Notebooks.title()), self.theme.title(focused)));

        let panel = self.console.notebooks();
        if panel.is_empty() {
            let text = if panel.is_loaded() { EMPTY_MESSAGE } else { "Loading..." };
            let placeholder = Paragraph::new(text)
                .style(Style::default().fg(colors.text_dim))
                .block(block);
            frame.render_widget(placeholder, area);
            return;
        }

        let items: Vec<ListItem> = panel
            .notebooks()
            .iter()
            .map(|nb| {
                ListItem::new(vec![
                    Line::from(Span::styled(
                        nb.name.clone(),
                        Style::default().fg(colors.text).add_modifier(Modifier::BOLD),
                    )),
                    Line::from(Span::styled(meta_line(nb), Style::default().fg(colors.text_dim))),
                ])
            })
            .collect();

        let highlight = if focused {
            Style::default().fg(colors.selection).add_modifier(Modifier::REVERSED)
        } else {
            Style::default()
        };
        let list = List::new(items).block(block).highlight_style(highlight);
        let mut state = ListState::default().with_selected(Some(panel.selected_index()));
        frame.render_stateful_widget(list, area, &mut state);
    }

    fn draw_logs(&self, frame: &mut Frame, area: Rect) {
        let focused = self.focus == FocusPanel::Logs;
        let colors = &self.theme.colors;
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(self.theme.border(focused))
            .title(Span::styled(format!(" {} ", FocusPanel::Logs.title()), self.theme.title(focused)));

        let logs = self.console.logs();
        let paragraph = if logs.is_empty() {
            Paragraph::new(EMPTY_PLACEHOLDER)
                .style(Style::default().fg(colors.text_dim))
                .wrap(Wrap { trim: true })
        } else {
            let height = area.height.saturating_sub(2) as usize;
            let lines: Vec<Line> = logs
                .tail(height)
                .iter()
                .map(|l| Line::from(Span::raw(l.as_str())))
                .collect();
            Paragraph::new(lines).style(Style::default().fg(colors.text))
        };
        frame.render_widget(paragraph.block(block), area);
    }

    /// Draw the footer with hotkey hints.
    fn draw_footer(&self, frame: &mut Frame, area: Rect) {
        let colors = &self.theme.colors;
        let hotkey_style = Style::default().fg(colors.hotkey);
        let mut hints = Vec::new();
        for (key, label) in [
            ("[a]", "Add "),
            ("[d]", "Remove "),
            ("[A]", "Apply "),
            ("[s]", "Start "),
            ("[S]", "Stop "),
            ("[n]", "Notebook "),
            ("[m]", "Master UI "),
            ("[c]", "Clear logs "),
            ("[?]", "Help "),
            ("[q]", "Quit"),
        ] {
            hints.push(Span::styled(key, hotkey_style));
            hints.push(Span::raw(label));
        }

        let footer = Paragraph::new(Line::from(hints))
            .style(Style::default().fg(colors.text_dim))
            .block(Block::default().borders(Borders::TOP));
        frame.render_widget(footer, area);
    }

    fn draw_help_overlay(&self, frame: &mut Frame, area: Rect) {
        let colors = &self.theme.colors;
        let overlay = widget::centered_rect(60, 26, area);
        frame.render_widget(Clear, overlay);

        let help_text = "\
sparkdeck Hotkey Reference

Workers:
  ↑ ↓      Select worker
  ← →      Select memory / cores
  + -      Change value (also Space / Backspace)
  a        Add worker
  d        Remove worker
  A        Apply configuration

Cluster:
  s        Start cluster
  S        Stop cluster
  m        Open master UI (when online)
  c        Clear logs
  r        Refresh everything

Notebooks:
  n        New notebook
  Enter    Open selected notebook
  d        Delete selected notebook

General:
  Tab      Next panel      q  Quit
  ?        This help       Ctrl+C  Force quit

Press any key to close this help.";

        let help = Paragraph::new(help_text)
            .style(Style::default().fg(colors.text))
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(colors.header))
                    .title(Span::styled(" Help ", self.theme.title(true)))
                    .style(Style::default().bg(colors.overlay_bg)),
            )
            .wrap(Wrap { trim: false });
        frame.render_widget(help, overlay);
    }
}

/// Enter raw mode and the alternate screen.
fn setup_terminal() -> Result<Terminal<CrosstermBackend<io::Stdout>>> {
    let init_err = |e: io::Error| DeckError::TerminalInit {
        message: e.to_string(),
    };
    crossterm::terminal::enable_raw_mode().map_err(init_err)?;
    let mut stdout = io::stdout();
    crossterm::execute!(stdout, crossterm::terminal::EnterAlternateScreen).map_err(init_err)?;
    Terminal::new(CrosstermBackend::new(stdout)).map_err(init_err)
}

fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
    let restore_err = |e: io::Error| DeckError::TerminalRestore {
        message: e.to_string(),
    };
    crossterm::terminal::disable_raw_mode().map_err(restore_err)?;
    crossterm::execute!(terminal.backend_mut(), crossterm::terminal::LeaveAlternateScreen)
        .map_err(restore_err)?;
    terminal.show_cursor().map_err(restore_err)
}

/// Put the terminal back into normal mode without a `Terminal` handle.
///
/// Used from the panic hook.
pub fn reset_terminal() {
    let _ = crossterm::terminal::disable_raw_mode();
    let _ = crossterm::execute!(io::stdout(), crossterm::terminal::LeaveAlternateScreen);
}

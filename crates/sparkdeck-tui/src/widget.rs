//! Widgets for the console panels and overlays.

use std::time::Instant;

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Cell, Clear, Paragraph, Row, Table, Wrap},
};

use sparkdeck_console::{
    Confirmation, DialogField, NotebookDialog, NotificationCenter, Pending, Phase, WorkerDraft,
};

use crate::theme::Theme;
use crate::view::Column;

/// At most this many toasts are stacked; older ones are not drawn.
const MAX_TOASTS: usize = 5;

const TOAST_WIDTH: u16 = 52;

/// Spinner frames for the loading overlay.
const SPINNER: [&str; 4] = ["◐", "◓", "◑", "◒"];

/// A `width`×`height` rectangle centered in `area`, clamped to fit.
pub fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    )
}

/// The worker draft as a table, one row per entry.
///
/// The cell under the cursor is highlighted when the panel is focused.
pub fn worker_table<'a>(
    draft: &WorkerDraft,
    cursor: usize,
    column: Column,
    focused: bool,
    theme: &Theme,
) -> Table<'a> {
    let selected = Style::default()
        .fg(theme.colors.overlay_bg)
        .bg(theme.colors.selection)
        .add_modifier(Modifier::BOLD);
    let normal = Style::default().fg(theme.colors.text);

    let rows: Vec<Row> = draft
        .rows()
        .into_iter()
        .map(|row| {
            let on_cursor = focused && row.position == cursor;
            let cell_style = |col: Column| {
                if on_cursor && col == column {
                    selected
                } else {
                    normal
                }
            };
            let marker = if on_cursor { "▸ " } else { "  " };
            Row::new(vec![
                Cell::from(format!("{marker}{}", row.label)).style(normal),
                Cell::from(format!("‹ {} ›", row.memory.label())).style(cell_style(Column::Memory)),
                Cell::from(format!("‹ {} ›", row.cores.label())).style(cell_style(Column::Cores)),
            ])
        })
        .collect();

    let header = Row::new(vec!["  Worker", "Memory", "Cores"]).style(
        Style::default()
            .fg(theme.colors.text_dim)
            .add_modifier(Modifier::BOLD),
    );

    Table::new(
        rows,
        [
            Constraint::Length(12),
            Constraint::Length(12),
            Constraint::Length(12),
        ],
    )
    .header(header)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(theme.border(focused))
            .title(Span::styled(
                format!(" Worker Configuration ({}) ", draft.len()),
                theme.title(focused),
            )),
    )
}

/// Rows needed for the worker table: borders, header and one line per worker.
pub fn worker_table_height(workers: usize) -> u16 {
    u16::try_from(workers).unwrap_or(u16::MAX).saturating_add(4)
}

/// Stack visible notifications in the top-right corner, newest at the bottom.
///
/// Toasts that are still entering or already leaving are drawn dimmed. Long
/// texts wrap; each toast grows to fit.
pub fn render_notifications(frame: &mut Frame, area: Rect, center: &NotificationCenter, now: Instant, theme: &Theme) {
    let shown: Vec<_> = center.entries(now).collect();
    let skip = shown.len().saturating_sub(MAX_TOASTS);
    let width = TOAST_WIDTH.min(area.width);
    let inner = width.saturating_sub(2).max(1) as usize;
    let mut y = area.y + 1;

    for (notification, phase) in shown.into_iter().skip(skip) {
        let text = notification.format_compact();
        let height = text.chars().count().div_ceil(inner) as u16 + 2;
        if y + height > area.y + area.height {
            break;
        }
        let color = theme.severity_color(notification.severity);
        let mut style = Style::default().fg(color);
        if phase != Phase::Visible {
            style = style.add_modifier(Modifier::DIM);
        }
        let toast_area = Rect::new(area.x + area.width - width, y, width, height);
        frame.render_widget(Clear, toast_area);
        frame.render_widget(
            Paragraph::new(Line::from(Span::styled(text, style)))
                .wrap(Wrap { trim: true })
                .block(
                    Block::default()
                        .borders(Borders::ALL)
                        .border_type(BorderType::Rounded)
                        .border_style(Style::default().fg(color))
                        .style(Style::default().bg(theme.colors.overlay_bg)),
                ),
            toast_area,
        );
        y += height;
    }
}

/// Blocking-loading overlay for the outstanding call.
pub fn render_loading(frame: &mut Frame, area: Rect, pending: &Pending, now: Instant, theme: &Theme) {
    let elapsed = now.saturating_duration_since(pending.since);
    let spinner = SPINNER[(elapsed.as_millis() / 150) as usize % SPINNER.len()];
    let text = format!("{spinner} {}...", pending.kind.label());

    let overlay = centered_rect(text.chars().count() as u16 + 6, 3, area);
    frame.render_widget(Clear, overlay);
    frame.render_widget(
        Paragraph::new(text)
            .alignment(Alignment::Center)
            .style(Style::default().fg(theme.colors.status_warning))
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(theme.colors.status_warning))
                    .style(Style::default().bg(theme.colors.overlay_bg)),
            ),
        overlay,
    );
}

/// Create-notebook dialog.
pub fn render_dialog(frame: &mut Frame, area: Rect, dialog: &NotebookDialog, theme: &Theme) {
    let overlay = centered_rect(56, 9, area);
    frame.render_widget(Clear, overlay);

    let field = |label: &str, value: &str, active: bool| {
        let style = if active {
            Style::default().fg(theme.colors.header).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(theme.colors.text)
        };
        let cursor = if active { "█" } else { "" };
        Line::from(vec![
            Span::styled(format!("{label:<10}"), Style::default().fg(theme.colors.text_dim)),
            Span::styled(format!("{value}{cursor}"), style),
        ])
    };

    let lines = vec![
        Line::raw(""),
        field("Name", &dialog.name, dialog.field == DialogField::Name),
        field("Template", &dialog.template, dialog.field == DialogField::Template),
        Line::raw(""),
        Line::from(vec![
            Span::styled("[Enter]", Style::default().fg(theme.colors.hotkey)),
            Span::raw(" Create  "),
            Span::styled("[Tab]", Style::default().fg(theme.colors.hotkey)),
            Span::raw(" Next field  "),
            Span::styled("[Esc]", Style::default().fg(theme.colors.hotkey)),
            Span::raw(" Cancel"),
        ]),
    ];

    frame.render_widget(
        Paragraph::new(lines).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(theme.colors.header))
                .title(Span::styled(" Create New Notebook ", theme.title(true)))
                .style(Style::default().bg(theme.colors.overlay_bg)),
        ),
        overlay,
    );
}

/// Yes/no prompt.
pub fn render_confirm(frame: &mut Frame, area: Rect, confirmation: &Confirmation, theme: &Theme) {
    let prompt = confirmation.prompt();
    let overlay = centered_rect(prompt.chars().count() as u16 + 6, 6, area);
    frame.render_widget(Clear, overlay);

    let lines = vec![
        Line::raw(prompt),
        Line::raw(""),
        Line::from(vec![
            Span::styled("[y]", Style::default().fg(theme.colors.hotkey)),
            Span::raw(" Yes   "),
            Span::styled("[n]", Style::default().fg(theme.colors.hotkey)),
            Span::raw(" No"),
        ]),
    ];

    frame.render_widget(
        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(theme.colors.status_warning))
                    .title(Span::styled(" Confirm ", Style::default().fg(theme.colors.status_warning)))
                    .style(Style::default().bg(theme.colors.overlay_bg)),
            ),
        overlay,
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_centered_rect_clamps() {
        let area = Rect::new(0, 0, 40, 10);
        let rect = centered_rect(20, 4, area);
        assert_eq!(rect, Rect::new(10, 3, 20, 4));

        let rect = centered_rect(100, 100, area);
        assert_eq!(rect, area);
    }

    #[test]
    fn test_worker_table_height_saturates() {
        assert_eq!(worker_table_height(2), 6);
        assert_eq!(worker_table_height(u16::MAX as usize - 1), u16::MAX);
        assert_eq!(worker_table_height(1_000_000), u16::MAX);
    }

    #[test]
    fn test_centered_rect_respects_offset() {
        let area = Rect::new(5, 5, 10, 10);
        let rect = centered_rect(4, 2, area);
        assert_eq!(rect, Rect::new(8, 9, 4, 2));
    }
}

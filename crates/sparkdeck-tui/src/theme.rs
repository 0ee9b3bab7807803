//! Color palette for the console.

use ratatui::style::{Color, Modifier, Style};
use sparkdeck_core::Severity;
use sparkdeck_console::Availability;

/// Color palette.
#[derive(Debug, Clone)]
pub struct ThemeColors {
    /// Title and focused borders
    pub header: Color,
    /// Hotkey hints
    pub hotkey: Color,
    /// Normal text
    pub text: Color,
    /// Secondary text (metadata, placeholders)
    pub text_dim: Color,
    /// Unfocused borders
    pub border_dim: Color,
    /// Selected cell or row
    pub selection: Color,
    /// Online badge, success notifications
    pub status_healthy: Color,
    /// Checking badge, info notifications
    pub status_warning: Color,
    /// Offline badge, error notifications
    pub status_error: Color,
    /// Background of modal overlays
    pub overlay_bg: Color,
}

#[derive(Debug, Clone)]
pub struct Theme {
    pub colors: ThemeColors,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            colors: ThemeColors {
                header: Color::Cyan,
                hotkey: Color::Yellow,
                text: Color::White,
                text_dim: Color::Gray,
                border_dim: Color::DarkGray,
                selection: Color::Cyan,
                status_healthy: Color::Green,
                status_warning: Color::Yellow,
                status_error: Color::Red,
                overlay_bg: Color::Black,
            },
        }
    }
}

impl Theme {
    pub fn severity_color(&self, severity: Severity) -> Color {
        match severity {
            Severity::Info => self.colors.header,
            Severity::Success => self.colors.status_healthy,
            Severity::Error => self.colors.status_error,
        }
    }

    pub fn availability_color(&self, availability: Availability) -> Color {
        match availability {
            Availability::Unknown => self.colors.status_warning,
            Availability::Online => self.colors.status_healthy,
            Availability::Offline => self.colors.status_error,
        }
    }

    pub fn border(&self, focused: bool) -> Style {
        if focused {
            Style::default().fg(self.colors.header)
        } else {
            Style::default().fg(self.colors.border_dim)
        }
    }

    pub fn title(&self, focused: bool) -> Style {
        if focused {
            Style::default()
                .fg(self.colors.header)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(self.colors.text)
        }
    }
}

use ratatui::style::{Color, Modifier, Style};

use super::state::TargetStatus;

const SPINNER: [&str; 8] = ["⣾", "⣽", "⣻", "⢿", "⡿", "⣟", "⣯", "⣷"];

/// Consistent theme for the TUI
pub struct Theme {
    pub selected: Style,
    pub focused: Style,
    pub error: Style,
    pub success: Style,
    pub warning: Style,
    pub info: Style,
    pub muted: Style,
    pub highlight: Style,
    pub modal_border: Style,
    pub key: Style,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            selected: Style::default()
                .bg(Color::Rgb(50, 50, 80))
                .add_modifier(Modifier::BOLD),
            focused: Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
            error: Style::default()
                .fg(Color::Red)
                .add_modifier(Modifier::BOLD),
            success: Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD),
            warning: Style::default()
                .fg(Color::Yellow),
            info: Style::default()
                .fg(Color::Blue),
            muted: Style::default()
                .fg(Color::DarkGray),
            highlight: Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
            modal_border: Style::default()
                .fg(Color::Cyan),
            key: Style::default()
                .fg(Color::Cyan),
        }
    }
}

impl Theme {
    /// Get status icon
    pub fn status_icon(status: &TargetStatus, tick: usize) -> &'static str {
        match status {
            TargetStatus::Pending => "○",
            TargetStatus::Running => Self::spinner(tick),
            TargetStatus::Done => "✓",
            TargetStatus::Failed => "✗",
        }
    }

    pub fn status_style(&self, status: &TargetStatus) -> Style {
        match status {
            TargetStatus::Pending => self.muted,
            TargetStatus::Running => self.focused,
            TargetStatus::Done => self.success,
            TargetStatus::Failed => self.error,
        }
    }

    pub fn spinner(tick: usize) -> &'static str {
        SPINNER[tick % SPINNER.len()]
    }
}

//! Wizard screens: local state, key handling, rendering and help hints

pub mod apply;
pub mod menu;
pub mod review;
pub mod scope;
pub mod service;
pub mod source;
pub mod targets;
pub mod trust;

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use super::navigator::{BreadcrumbStep, Screen, Wizard};
use super::theme::Theme;

/// (key, description) pair shown in the help bar
pub type Hint = (&'static str, &'static str);

/// Draw the whole wizard: breadcrumb, active screen, help bar
pub fn render(frame: &mut Frame, wizard: &Wizard, theme: &Theme) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Breadcrumb
            Constraint::Min(0),    // Screen body
            Constraint::Length(1), // Help bar
        ])
        .split(frame.area());

    render_breadcrumb(frame, chunks[0], &wizard.breadcrumb(), theme);

    let body = chunks[1];
    match wizard.screen() {
        Screen::Menu(screen) => menu::render(frame, body, screen, theme),
        Screen::Source(screen) => source::render(frame, body, screen, theme),
        Screen::Service(screen) => service::render(frame, body, screen, theme, wizard.tick()),
        Screen::Trust(screen) => trust::render(frame, body, screen, theme, wizard.tick()),
        Screen::Target(screen) => targets::render(frame, body, screen, theme),
        Screen::Scope(screen) => scope::render(frame, body, screen, theme),
        Screen::Review(screen) => review::render(frame, body, screen, wizard.state(), theme, wizard.tick()),
        Screen::Apply(screen) => apply::render(frame, body, screen, theme, wizard.tick()),
    }

    render_help(frame, chunks[2], &wizard.screen().hints(), theme);
}

fn render_breadcrumb(frame: &mut Frame, area: Rect, steps: &[BreadcrumbStep], theme: &Theme) {
    let mut spans = Vec::new();
    for step in steps.iter().filter(|s| s.visible) {
        if !spans.is_empty() {
            spans.push(Span::styled(" › ", theme.muted));
        }
        if step.completed {
            spans.push(Span::styled("✓ ", theme.success));
            spans.push(Span::raw(step.value.clone()));
        } else {
            spans.push(Span::styled(step.label, theme.focused));
        }
    }

    let breadcrumb = Paragraph::new(Line::from(spans)).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" MCP Wizard ")
            .title_style(theme.highlight),
    );
    frame.render_widget(breadcrumb, area);
}

fn render_help(frame: &mut Frame, area: Rect, hints: &[Hint], theme: &Theme) {
    let mut spans = Vec::new();
    for (key, description) in hints {
        spans.push(Span::styled(format!("[{key}]"), theme.key));
        spans.push(Span::raw(format!(" {description}  ")));
    }
    spans.push(Span::styled("[Ctrl+C]", theme.key));
    spans.push(Span::raw(" Quit"));

    let help = Paragraph::new(Line::from(spans)).style(theme.muted);
    frame.render_widget(help, area);
}

/// One selectable row, marked with `▶` when highlighted
pub(crate) fn choice_line<'a>(selected: bool, label: &'a str, detail: &'a str, theme: &Theme) -> Line<'a> {
    let marker = if selected { "▶ " } else { "  " };
    let label_style = if selected { theme.focused } else { Style::default() };
    Line::from(vec![
        Span::raw(marker),
        Span::styled(label, label_style),
        Span::raw("  "),
        Span::styled(detail, theme.muted),
    ])
}

/// First visible row so that `cursor` stays inside a window of `height` rows
pub(crate) fn scroll_offset(cursor: usize, height: usize) -> usize {
    if height == 0 {
        return cursor;
    }
    cursor.saturating_sub(height - 1)
}

/// Move a cursor up or down inside `len` rows
pub(crate) fn step_cursor(cursor: usize, len: usize, down: bool) -> usize {
    if len == 0 {
        return 0;
    }
    if down {
        (cursor + 1).min(len - 1)
    } else {
        cursor.saturating_sub(1)
    }
}

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use super::{choice_line, Hint};
use crate::cli::tui::wizard::apply::{ApplyPhase, ApplyScreen, DoneChoice};
use crate::cli::tui::wizard::modal::{centered_rect, render_modal, wrapped, yes_no_line};
use crate::cli::tui::wizard::theme::Theme;

pub fn hints(screen: &ApplyScreen) -> Vec<Hint> {
    match screen.phase() {
        ApplyPhase::Running | ApplyPhase::CredCleanup { removing: true, .. } => Vec::new(),
        ApplyPhase::CredCleanup { .. } => vec![("←→", "Choose"), ("Enter", "Confirm"), ("Esc", "Skip")],
        ApplyPhase::Done { .. } => vec![("↑↓", "Navigate"), ("Enter", "Select"), ("Esc", "Menu")],
    }
}

pub fn render(frame: &mut Frame, area: Rect, screen: &ApplyScreen, theme: &Theme, tick: usize) {
    let done = matches!(screen.phase(), ApplyPhase::Done { .. });
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2), // Header
            Constraint::Min(0),    // Target rows
            Constraint::Length(if done { 6 } else { 0 }),
        ])
        .split(area);

    let header = if done {
        let style = if screen.has_failures() { theme.error } else { theme.success };
        Line::from(Span::styled(screen.header(), style))
    } else {
        Line::from(vec![
            Span::styled(Theme::spinner(tick), theme.focused),
            Span::raw(format!(
                " {} {}…",
                screen.action().as_str(),
                screen.entry().display_name()
            )),
        ])
    };
    frame.render_widget(Paragraph::new(header), chunks[0]);

    let mut rows = Vec::new();
    for result in screen.results() {
        rows.push(Line::from(vec![
            Span::styled(
                format!(" {} ", Theme::status_icon(&result.status, tick)),
                theme.status_style(&result.status),
            ),
            Span::raw(result.name.clone()),
        ]));
        if let Some(error) = &result.error {
            rows.push(Line::from(Span::styled(format!("     {error}"), theme.error)));
        }
        if let Some(hint) = &result.auth_hint {
            rows.push(Line::from(Span::styled(format!("     Sign in: {hint}"), theme.info)));
        }
    }
    if let Some(message) = screen.cleanup_message() {
        rows.push(Line::from(""));
        rows.push(Line::from(Span::styled(message.to_string(), theme.muted)));
    }
    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!(" {} scope ", screen.scope().as_str()));
    frame.render_widget(Paragraph::new(rows).block(block).wrap(Wrap { trim: false }), chunks[1]);

    match screen.phase() {
        ApplyPhase::Done { cursor } => {
            let mut lines = vec![Line::from("What next?")];
            for (i, choice) in DoneChoice::ALL.iter().enumerate() {
                lines.push(choice_line(i == cursor, choice.label(screen.action()), "", theme));
            }
            frame.render_widget(Paragraph::new(lines), chunks[2]);
        }
        ApplyPhase::CredCleanup { remove, removing } => {
            let inner = render_modal(frame, centered_rect(60, 40, area), "Stored credentials", theme);
            let names = screen.cleanup_names().join(", ");
            let mut lines = vec![
                Line::from("Remove stored credentials for this service?"),
                Line::from(Span::styled(names, theme.muted)),
                Line::from(""),
            ];
            if removing {
                lines.push(Line::from(vec![
                    Span::styled(Theme::spinner(tick), theme.focused),
                    Span::raw(" Removing…"),
                ]));
            } else {
                lines.push(yes_no_line(remove, theme));
            }
            frame.render_widget(wrapped(lines), inner);
        }
        ApplyPhase::Running => {}
    }
}

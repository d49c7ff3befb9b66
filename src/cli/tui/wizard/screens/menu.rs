//! Main menu: install, uninstall or exit

use ratatui::{
    crossterm::event::{KeyCode, KeyEvent},
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use super::{choice_line, step_cursor, Hint};
use crate::cli::tui::wizard::navigator::Outcome;
use crate::cli::tui::wizard::state::Action;
use crate::cli::tui::wizard::theme::Theme;

const ITEMS: [(&str, &str); 3] = [
    ("Install", "add an MCP server to your tools"),
    ("Uninstall", "remove an MCP server from your tools"),
    ("Exit", ""),
];

#[derive(Debug, Default)]
pub struct MenuScreen {
    cursor: usize,
}

impl MenuScreen {
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> Option<Outcome> {
        match key.code {
            KeyCode::Up => self.cursor = step_cursor(self.cursor, ITEMS.len(), false),
            KeyCode::Down => self.cursor = step_cursor(self.cursor, ITEMS.len(), true),
            KeyCode::Char('i') => return Some(Outcome::ChooseAction(Action::Install)),
            KeyCode::Char('u') => return Some(Outcome::ChooseAction(Action::Uninstall)),
            KeyCode::Char('q') => return Some(Outcome::Quit),
            KeyCode::Enter => {
                return Some(match self.cursor {
                    0 => Outcome::ChooseAction(Action::Install),
                    1 => Outcome::ChooseAction(Action::Uninstall),
                    _ => Outcome::Quit,
                })
            }
            _ => {}
        }
        None
    }

    pub fn hints(&self) -> Vec<Hint> {
        vec![("↑↓", "Navigate"), ("Enter", "Select"), ("q", "Quit")]
    }
}

pub fn render(frame: &mut Frame, area: Rect, screen: &MenuScreen, theme: &Theme) {
    let content_height = 10;
    let padding = area.height.saturating_sub(content_height) / 2;
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(padding),
            Constraint::Length(content_height),
            Constraint::Min(0),
        ])
        .split(area);

    let mut lines = vec![
        Line::from(Span::styled("MCP Server Wizard", theme.highlight)),
        Line::from("Install Model Context Protocol servers into your AI tools"),
        Line::from(""),
    ];
    for (i, (label, detail)) in ITEMS.iter().enumerate() {
        lines.push(choice_line(i == screen.cursor, label, detail, theme));
    }

    frame.render_widget(Paragraph::new(lines).alignment(Alignment::Center), chunks[1]);
}

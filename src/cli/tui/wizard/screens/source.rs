use ratatui::{
    crossterm::event::{KeyCode, KeyEvent},
    layout::Rect,
    text::Line,
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use super::{choice_line, step_cursor, Hint};
use crate::catalog::SourceChoice;
use crate::cli::tui::wizard::navigator::Outcome;
use crate::cli::tui::wizard::theme::Theme;

fn describe(source: SourceChoice) -> &'static str {
    match source {
        SourceChoice::Curated => "hand-picked, well-known servers",
        SourceChoice::Registry => "community servers from the MCP registry",
        SourceChoice::All => "curated and registry servers together",
    }
}

#[derive(Debug, Default)]
pub struct SourceScreen {
    cursor: usize,
}

impl SourceScreen {
    pub fn handle_key(&mut self, key: KeyEvent) -> Option<Outcome> {
        let len = SourceChoice::ALL.len();
        match key.code {
            KeyCode::Up => self.cursor = step_cursor(self.cursor, len, false),
            KeyCode::Down => self.cursor = step_cursor(self.cursor, len, true),
            KeyCode::Enter => return Some(Outcome::ChooseSource(SourceChoice::ALL[self.cursor])),
            KeyCode::Esc => return Some(Outcome::Back),
            _ => {}
        }
        None
    }

    pub fn hints(&self) -> Vec<Hint> {
        vec![("↑↓", "Navigate"), ("Enter", "Select"), ("Esc", "Back")]
    }
}

pub fn render(frame: &mut Frame, area: Rect, screen: &SourceScreen, theme: &Theme) {
    let mut lines = vec![Line::from("Where should servers come from?"), Line::from("")];
    for (i, source) in SourceChoice::ALL.iter().enumerate() {
        lines.push(choice_line(i == screen.cursor, source.as_str(), describe(*source), theme));
    }

    let block = Block::default().borders(Borders::ALL).title(" Source ");
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

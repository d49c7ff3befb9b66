use std::sync::Arc;

use ratatui::{
    crossterm::event::{KeyCode, KeyEvent},
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use super::{choice_line, step_cursor, Hint};
use crate::cli::tui::wizard::navigator::Outcome;
use crate::cli::tui::wizard::theme::Theme;
use crate::targets::{Scope, Target};

#[derive(Debug)]
pub struct ScopeScreen {
    cursor: usize,
    /// Chosen targets that only have a user-level config
    user_only: Vec<String>,
}

impl ScopeScreen {
    pub fn new(targets: &[Arc<dyn Target>]) -> Self {
        Self {
            cursor: 0,
            user_only: targets
                .iter()
                .filter(|t| !t.supports_scope(Scope::Project))
                .map(|t| t.name().to_string())
                .collect(),
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> Option<Outcome> {
        let len = Scope::ALL.len();
        match key.code {
            KeyCode::Up => self.cursor = step_cursor(self.cursor, len, false),
            KeyCode::Down => self.cursor = step_cursor(self.cursor, len, true),
            KeyCode::Enter => return Some(Outcome::ChooseScope(Scope::ALL[self.cursor])),
            KeyCode::Esc => return Some(Outcome::Back),
            _ => {}
        }
        None
    }

    pub fn hints(&self) -> Vec<Hint> {
        vec![("↑↓", "Navigate"), ("Enter", "Select"), ("Esc", "Back")]
    }
}

pub fn render(frame: &mut Frame, area: Rect, screen: &ScopeScreen, theme: &Theme) {
    let mut lines = vec![Line::from("Where should the server be configured?"), Line::from("")];
    for (i, scope) in Scope::ALL.iter().enumerate() {
        lines.push(choice_line(i == screen.cursor, scope.as_str(), scope.description(), theme));
    }
    if !screen.user_only.is_empty() {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            format!("{} always use user scope", screen.user_only.join(", ")),
            theme.muted,
        )));
    }

    let block = Block::default().borders(Borders::ALL).title(" Scope ");
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

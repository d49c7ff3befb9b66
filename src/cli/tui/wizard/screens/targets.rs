//! Target selection (multi-select)

use std::sync::Arc;

use ratatui::{
    crossterm::event::{KeyCode, KeyEvent},
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use super::{step_cursor, Hint};
use crate::cli::tui::wizard::navigator::Outcome;
use crate::cli::tui::wizard::theme::Theme;
use crate::targets::{Scope, Target};

#[derive(Debug)]
pub struct TargetScreen {
    targets: Vec<Arc<dyn Target>>,
    selected: Vec<bool>,
    cursor: usize,
    warning: Option<&'static str>,
}

impl TargetScreen {
    /// Targets ordered installed-first, then by slug
    ///
    /// `previous` restores an earlier selection; without one, every
    /// installed target starts selected.
    pub fn new(mut targets: Vec<Arc<dyn Target>>, previous: &[Arc<dyn Target>]) -> Self {
        targets.sort_by(|a, b| {
            b.is_installed()
                .cmp(&a.is_installed())
                .then_with(|| a.slug().cmp(b.slug()))
        });
        let selected = targets
            .iter()
            .map(|t| {
                if previous.is_empty() {
                    t.is_installed()
                } else {
                    previous.iter().any(|p| p.slug() == t.slug())
                }
            })
            .collect();

        Self {
            targets,
            selected,
            cursor: 0,
            warning: None,
        }
    }

    pub fn targets(&self) -> &[Arc<dyn Target>] {
        &self.targets
    }

    pub fn is_selected(&self, index: usize) -> bool {
        self.selected.get(index).copied().unwrap_or(false)
    }

    /// Selected targets in display order
    pub fn selection(&self) -> Vec<Arc<dyn Target>> {
        self.targets
            .iter()
            .zip(&self.selected)
            .filter(|(_, selected)| **selected)
            .map(|(t, _)| t.clone())
            .collect()
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> Option<Outcome> {
        let len = self.targets.len();
        match key.code {
            KeyCode::Up => self.cursor = step_cursor(self.cursor, len, false),
            KeyCode::Down => self.cursor = step_cursor(self.cursor, len, true),
            KeyCode::Char(' ') => {
                if let Some(selected) = self.selected.get_mut(self.cursor) {
                    *selected = !*selected;
                    self.warning = None;
                }
            }
            KeyCode::Char('a') => {
                let all = self.selected.iter().all(|s| *s);
                self.selected.iter_mut().for_each(|s| *s = !all);
                self.warning = None;
            }
            KeyCode::Enter => {
                let selection = self.selection();
                if selection.is_empty() {
                    self.warning = Some("Select at least one target");
                    return None;
                }
                return Some(Outcome::ChooseTargets(selection));
            }
            KeyCode::Esc => return Some(Outcome::Back),
            _ => {}
        }
        None
    }

    pub fn hints(&self) -> Vec<Hint> {
        vec![
            ("↑↓", "Navigate"),
            ("Space", "Toggle"),
            ("a", "All"),
            ("Enter", "Continue"),
            ("Esc", "Back"),
        ]
    }
}

pub fn render(frame: &mut Frame, area: Rect, screen: &TargetScreen, theme: &Theme) {
    let mut lines = vec![Line::from("Which tools should be configured?"), Line::from("")];

    for (i, target) in screen.targets.iter().enumerate() {
        let checkbox = if screen.is_selected(i) { "[x]" } else { "[ ]" };
        let row_style = if i == screen.cursor { theme.selected } else { Style::default() };
        let mut spans = vec![
            Span::styled(format!(" {checkbox} {} ", target.name()), row_style),
        ];
        if target.is_installed() {
            spans.push(Span::styled(" detected", theme.success));
        } else {
            spans.push(Span::styled(" not detected", theme.muted));
        }
        if !target.supports_scope(Scope::Project) {
            spans.push(Span::styled("  (user scope only)", theme.muted));
        }
        lines.push(Line::from(spans));
    }

    if let Some(warning) = screen.warning {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(warning, theme.warning)));
    }

    let block = Block::default().borders(Borders::ALL).title(" Targets ");
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

//! Summary before apply, hosting the credential prompts for install

use std::collections::BTreeMap;

use ratatui::{
    crossterm::event::{KeyCode, KeyEvent},
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use super::service::detail_row;
use super::Hint;
use crate::catalog::config_key;
use crate::cli::tui::wizard::credentials::{CredentialFlow, CredentialStage};
use crate::cli::tui::wizard::modal::{centered_rect, render_modal, wrapped, yes_no_line};
use crate::cli::tui::wizard::navigator::Outcome;
use crate::cli::tui::wizard::state::{Action, WizardState};
use crate::cli::tui::wizard::theme::Theme;

#[derive(Debug, Default)]
pub enum ReviewPhase {
    #[default]
    Summary,
    /// Waiting for pre-supplied credential values
    Checking,
    Credentials(CredentialFlow),
}

#[derive(Debug, Default)]
pub struct ReviewScreen {
    /// 0 = Apply, 1 = Cancel
    cursor: usize,
    phase: ReviewPhase,
}

impl ReviewScreen {
    pub fn phase(&self) -> &ReviewPhase {
        &self.phase
    }

    pub fn set_phase(&mut self, phase: ReviewPhase) {
        self.phase = phase;
    }

    pub fn is_checking(&self) -> bool {
        matches!(self.phase, ReviewPhase::Checking)
    }

    pub fn credentials(&self) -> Option<&CredentialFlow> {
        match &self.phase {
            ReviewPhase::Credentials(flow) => Some(flow),
            _ => None,
        }
    }

    /// Finished credential values, leaving the screen on its summary
    pub fn take_resolved(&mut self) -> Option<BTreeMap<String, String>> {
        match &self.phase {
            ReviewPhase::Credentials(flow) if flow.is_complete() => {}
            _ => return None,
        }
        match std::mem::take(&mut self.phase) {
            ReviewPhase::Credentials(flow) => Some(flow.into_resolved()),
            _ => None,
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> Option<Outcome> {
        match &mut self.phase {
            ReviewPhase::Credentials(flow) => flow.handle_key(key).map(Outcome::Credential),
            ReviewPhase::Checking => None,
            ReviewPhase::Summary => match key.code {
                KeyCode::Left | KeyCode::Right | KeyCode::Up | KeyCode::Down | KeyCode::Tab => {
                    self.cursor = 1 - self.cursor;
                    None
                }
                KeyCode::Enter if self.cursor == 0 => Some(Outcome::Confirm),
                KeyCode::Enter | KeyCode::Esc => Some(Outcome::Back),
                _ => None,
            },
        }
    }

    pub fn hints(&self) -> Vec<Hint> {
        match &self.phase {
            ReviewPhase::Credentials(flow) => match flow.stage() {
                CredentialStage::Input => {
                    let mut hints = vec![("Enter", "Submit")];
                    if flow.current().is_some_and(|v| !v.setup_url.is_empty()) {
                        hints.push(("Ctrl+O", "Open setup page"));
                    }
                    hints.push(("Esc", "Cancel"));
                    hints
                }
                CredentialStage::Save { .. } => {
                    vec![("←→", "Choose"), ("Enter", "Confirm"), ("Esc", "Don't save")]
                }
            },
            ReviewPhase::Checking => Vec::new(),
            ReviewPhase::Summary => vec![("←→", "Choose"), ("Enter", "Confirm"), ("Esc", "Back")],
        }
    }
}

pub fn render(
    frame: &mut Frame,
    area: Rect,
    screen: &ReviewScreen,
    state: &WizardState,
    theme: &Theme,
    tick: usize,
) {
    let mut lines = Vec::new();
    lines.push(detail_row("Action", state.action.as_str(), theme));
    if let Some(entry) = &state.entry {
        lines.push(detail_row("Service", entry.display_name(), theme));
        lines.push(detail_row("Key", &config_key(entry.name()), theme));
        lines.push(detail_row("Source", entry.source().as_str(), theme));
    }
    let names: Vec<&str> = state.targets.iter().map(|t| t.name()).collect();
    lines.push(detail_row("Targets", &names.join(", "), theme));
    if let Some(scope) = state.scope {
        lines.push(detail_row("Scope", scope.as_str(), theme));
    }

    if state.action == Action::Install {
        if let Some(entry) = &state.entry {
            let required = entry.required_env_vars();
            if !required.is_empty() {
                lines.push(Line::from(""));
                lines.push(Line::from(Span::styled("Required credentials", theme.highlight)));
                for var in required {
                    lines.push(Line::from(format!("  {}  {}", var.name, var.description)));
                }
            }
        }
    }

    lines.push(Line::from(""));
    match &screen.phase {
        ReviewPhase::Checking => lines.push(Line::from(vec![
            Span::styled(Theme::spinner(tick), theme.focused),
            Span::raw(" Checking credentials…"),
        ])),
        _ => {
            let (apply, cancel) = if screen.cursor == 0 {
                (theme.selected, theme.muted)
            } else {
                (theme.muted, theme.selected)
            };
            lines.push(Line::from(vec![
                Span::styled(format!("  {}  ", state.action.as_str()), apply),
                Span::raw("   "),
                Span::styled("  Cancel  ", cancel),
            ]));
        }
    }

    let block = Block::default().borders(Borders::ALL).title(" Review ");
    frame.render_widget(Paragraph::new(lines).block(block).wrap(Wrap { trim: false }), area);

    if let ReviewPhase::Credentials(flow) = &screen.phase {
        render_credential_modal(frame, area, flow, theme);
    }
}

fn render_credential_modal(frame: &mut Frame, area: Rect, flow: &CredentialFlow, theme: &Theme) {
    let Some(var) = flow.current() else {
        return;
    };
    let (position, total) = flow.progress();
    let modal_area = centered_rect(70, 60, area);
    let inner = render_modal(
        frame,
        modal_area,
        &format!("Credential {position} of {total}"),
        theme,
    );

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(4),    // Description
            Constraint::Length(3), // Masked input
            Constraint::Length(2), // Save prompt
        ])
        .split(inner);

    let mut lines = vec![Line::from(Span::styled(var.name.clone(), theme.highlight))];
    if !var.description.is_empty() {
        lines.push(Line::from(var.description.clone()));
    }
    if !var.setup_hint.is_empty() {
        lines.push(Line::from(Span::styled(var.setup_hint.clone(), theme.info)));
    }
    if !var.setup_url.is_empty() {
        lines.push(Line::from(vec![
            Span::styled("Get one at ", theme.muted),
            Span::raw(var.setup_url.clone()),
        ]));
    }
    frame.render_widget(wrapped(lines), chunks[0]);

    let input = Paragraph::new(Line::from(vec![
        Span::raw(flow.masked_value()),
        Span::styled("█", theme.focused),
    ]))
    .block(Block::default().borders(Borders::ALL).title(" Value "));
    frame.render_widget(input, chunks[1]);

    if let CredentialStage::Save { save } = flow.stage() {
        let prompt = vec![
            Line::from("Save to the credential store for next time?"),
            yes_no_line(save, theme),
        ];
        frame.render_widget(Paragraph::new(prompt), chunks[2]);
    }
}

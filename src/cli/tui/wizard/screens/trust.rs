//! Confirmation gate for community (registry) servers

use ratatui::{
    crossterm::event::{KeyCode, KeyEvent},
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use super::service::detail_row;
use super::Hint;
use crate::catalog::Entry;
use crate::cli::tui::wizard::modal::yes_no_line;
use crate::cli::tui::wizard::navigator::Outcome;
use crate::cli::tui::wizard::theme::Theme;

#[derive(Debug)]
pub struct TrustScreen {
    entry: Entry,
    accept: bool,
    refreshing: bool,
}

impl TrustScreen {
    pub fn new(entry: Entry) -> Self {
        Self {
            entry,
            accept: true,
            refreshing: false,
        }
    }

    pub fn entry(&self) -> &Entry {
        &self.entry
    }

    pub fn is_refreshing(&self) -> bool {
        self.refreshing
    }

    pub fn set_refreshing(&mut self) {
        self.refreshing = true;
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> Option<Outcome> {
        if key.code == KeyCode::Esc {
            return Some(Outcome::Back);
        }
        if self.refreshing {
            return None;
        }
        match key.code {
            KeyCode::Left | KeyCode::Right | KeyCode::Up | KeyCode::Down | KeyCode::Tab => {
                self.accept = !self.accept;
                None
            }
            KeyCode::Char('y') | KeyCode::Char('Y') => Some(Outcome::Trust(true)),
            KeyCode::Char('n') | KeyCode::Char('N') => Some(Outcome::Trust(false)),
            KeyCode::Enter => Some(Outcome::Trust(self.accept)),
            _ => None,
        }
    }

    pub fn hints(&self) -> Vec<Hint> {
        if self.refreshing {
            return vec![("Esc", "Back")];
        }
        vec![("←→", "Choose"), ("Enter", "Confirm"), ("Esc", "Back")]
    }
}

pub fn render(frame: &mut Frame, area: Rect, screen: &TrustScreen, theme: &Theme, tick: usize) {
    let entry = &screen.entry;
    let mut lines = vec![
        Line::from(Span::styled(
            "This server comes from the community registry and has not been reviewed.",
            theme.warning,
        )),
        Line::from("It will run with your user's permissions. Only continue if you trust its publisher."),
        Line::from(""),
        detail_row("Name", entry.name(), theme),
        detail_row("Title", entry.display_name(), theme),
        detail_row("Install", entry.install_type(), theme),
    ];
    if let Some(version) = entry.version() {
        lines.push(detail_row("Version", version, theme));
    }
    if let Some(types) = entry.package_types() {
        lines.push(detail_row("Packages", &types.join(", "), theme));
    }
    for url in entry.remote_urls() {
        lines.push(detail_row("Remote", url, theme));
    }
    if let Some(repository) = entry.repository_url() {
        lines.push(detail_row("Source", repository, theme));
    }
    lines.push(Line::from(""));

    if screen.refreshing {
        lines.push(Line::from(vec![
            Span::styled(Theme::spinner(tick), theme.focused),
            Span::raw(" Fetching latest server details…"),
        ]));
    } else {
        lines.push(Line::from("Trust this server and continue?"));
        lines.push(yes_no_line(screen.accept, theme));
    }

    let block = Block::default().borders(Borders::ALL).title(" Trust ");
    frame.render_widget(Paragraph::new(lines).block(block).wrap(Wrap { trim: false }), area);
}

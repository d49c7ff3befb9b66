//! Service selection: searchable list over the loaded catalog

use ratatui::{
    crossterm::event::{Event, KeyCode, KeyEvent},
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};
use tui_input::backend::crossterm::EventHandler;
use tui_input::Input;

use super::{scroll_offset, step_cursor, Hint};
use crate::catalog::{Catalog, Entry, SourceChoice};
use crate::cli::tui::wizard::navigator::Outcome;
use crate::cli::tui::wizard::theme::Theme;

const PAGE: usize = 10;

#[derive(Debug)]
pub struct ServiceScreen {
    source: SourceChoice,
    catalog: Option<Catalog>,
    error: Option<String>,
    filter: Input,
    visible: Vec<Entry>,
    cursor: usize,
    status: String,
    page: usize,
}

impl ServiceScreen {
    /// Waiting for the catalog of `source`
    pub fn loading(source: SourceChoice) -> Self {
        Self {
            source,
            catalog: None,
            error: None,
            filter: Input::default(),
            visible: Vec::new(),
            cursor: 0,
            status: String::new(),
            page: PAGE,
        }
    }

    pub fn ready(source: SourceChoice, catalog: Catalog) -> Self {
        let mut screen = Self::loading(source);
        screen.set_catalog(catalog);
        screen
    }

    pub fn source(&self) -> SourceChoice {
        self.source
    }

    pub fn is_loading(&self) -> bool {
        self.catalog.is_none() && self.error.is_none()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    /// Entries matching the current filter, sorted by name
    pub fn visible(&self) -> &[Entry] {
        &self.visible
    }

    pub fn highlighted(&self) -> Option<&Entry> {
        self.visible.get(self.cursor)
    }

    pub fn filter(&self) -> &str {
        self.filter.value()
    }

    pub fn set_catalog(&mut self, catalog: Catalog) {
        self.catalog = Some(catalog);
        self.refilter();
    }

    pub fn set_error(&mut self, error: String) {
        self.error = Some(error);
    }

    pub fn set_status(&mut self, status: String) {
        self.status = status;
    }

    pub fn resize(&mut self, _width: u16, height: u16) {
        self.page = (height as usize).saturating_sub(12).max(1);
    }

    fn refilter(&mut self) {
        self.visible = self
            .catalog
            .as_ref()
            .map(|c| c.search(self.filter.value()))
            .unwrap_or_default();
        self.cursor = self.cursor.min(self.visible.len().saturating_sub(1));
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> Option<Outcome> {
        if key.code == KeyCode::Esc {
            return Some(Outcome::Back);
        }
        // Loading and failed catalogs only accept Back
        if self.catalog.is_none() {
            return None;
        }

        let len = self.visible.len();
        match key.code {
            KeyCode::Up => self.cursor = step_cursor(self.cursor, len, false),
            KeyCode::Down => self.cursor = step_cursor(self.cursor, len, true),
            KeyCode::PageUp => self.cursor = self.cursor.saturating_sub(self.page),
            KeyCode::PageDown => {
                self.cursor = (self.cursor + self.page).min(len.saturating_sub(1))
            }
            KeyCode::Enter => return self.highlighted().cloned().map(Outcome::ChooseEntry),
            _ => {
                self.filter.handle_event(&Event::Key(key));
                self.cursor = 0;
                self.refilter();
            }
        }
        None
    }

    pub fn hints(&self) -> Vec<Hint> {
        if self.catalog.is_none() {
            return vec![("Esc", "Back")];
        }
        vec![
            ("↑↓", "Navigate"),
            ("Type", "Search"),
            ("Enter", "Select"),
            ("Esc", "Back"),
        ]
    }
}

pub fn render(frame: &mut Frame, area: Rect, screen: &ServiceScreen, theme: &Theme, tick: usize) {
    let title = format!(" Services ({}) ", screen.source.as_str());

    if let Some(error) = screen.error() {
        let lines = vec![
            Line::from(Span::styled("Could not load the catalog", theme.error)),
            Line::from(""),
            Line::from(error.to_string()),
            Line::from(""),
            Line::from(Span::styled("Press Esc to go back", theme.muted)),
        ];
        let block = Block::default().borders(Borders::ALL).title(title);
        frame.render_widget(Paragraph::new(lines).block(block).wrap(Wrap { trim: false }), area);
        return;
    }

    if screen.is_loading() {
        let status = if screen.status.is_empty() {
            "Loading catalog…"
        } else {
            screen.status.as_str()
        };
        let line = Line::from(vec![
            Span::styled(Theme::spinner(tick), theme.focused),
            Span::raw(" "),
            Span::raw(status.to_string()),
        ]);
        let block = Block::default().borders(Borders::ALL).title(title);
        frame.render_widget(Paragraph::new(line).block(block), area);
        return;
    }

    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);
    let left = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(0)])
        .split(chunks[0]);

    // Search box
    let search = Paragraph::new(Line::from(vec![
        Span::raw(screen.filter().to_string()),
        Span::styled("█", theme.focused),
    ]))
    .block(Block::default().borders(Borders::ALL).title(" Search "));
    frame.render_widget(search, left[0]);

    // Entry list
    let list_block = Block::default()
        .borders(Borders::ALL)
        .title(format!("{}[{}] ", title, screen.visible.len()));
    let height = list_block.inner(left[1]).height as usize;
    let offset = scroll_offset(screen.cursor, height);
    let lines: Vec<Line> = screen
        .visible
        .iter()
        .enumerate()
        .skip(offset)
        .take(height)
        .map(|(i, entry)| {
            let style = if i == screen.cursor { theme.selected } else { Style::default() };
            Line::from(vec![
                Span::styled(format!(" {} ", entry.display_name()), style),
                Span::styled(format!(" {}", entry.source().as_str().to_lowercase()), theme.muted),
            ])
        })
        .collect();
    let list = if lines.is_empty() {
        Paragraph::new(Line::from(Span::styled("No matching services", theme.muted)))
    } else {
        Paragraph::new(lines)
    };
    frame.render_widget(list.block(list_block), left[1]);

    render_detail(frame, chunks[1], screen.highlighted(), theme);
}

fn render_detail(frame: &mut Frame, area: Rect, entry: Option<&Entry>, theme: &Theme) {
    let block = Block::default().borders(Borders::ALL).title(" Details ");
    let Some(entry) = entry else {
        frame.render_widget(block, area);
        return;
    };

    let mut lines = vec![
        Line::from(Span::styled(entry.display_name().to_string(), theme.highlight)),
        Line::from(Span::styled(entry.name().to_string(), theme.muted)),
        Line::from(""),
        Line::from(entry.description().to_string()),
        Line::from(""),
        detail_row("Source", entry.source().as_str(), theme),
        detail_row("Transport", entry.transport(), theme),
        detail_row("Install", entry.install_type(), theme),
    ];
    if let Some(version) = entry.version() {
        lines.push(detail_row("Version", version, theme));
    }
    let vars = entry.env_var_names();
    if !vars.is_empty() {
        lines.push(detail_row("Env", &vars.join(", "), theme));
    }
    if let Some(url) = entry.docs_url().or_else(|| entry.repository_url()) {
        lines.push(detail_row("Docs", url, theme));
    }

    frame.render_widget(
        Paragraph::new(lines).block(block).wrap(Wrap { trim: false }),
        area,
    );
}

pub(crate) fn detail_row(label: &str, value: &str, theme: &Theme) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("{label:<10}"), theme.muted),
        Span::raw(value.to_string()),
    ])
}

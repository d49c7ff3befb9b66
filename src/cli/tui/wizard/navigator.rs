//! Screen graph of the wizard
//!
//! ```text
//! Menu ─► Source ─► Service ─► [Trust] ─► Target ─► [Scope] ─► Review ─► Apply
//! ```
//!
//! Source is skipped when the registry is disabled, Trust is only shown for
//! registry entries and Scope only when a chosen target can be configured per
//! project. [`Wizard::handle`] reacts to one event at a time and returns the
//! tasks the event loop should run; it never blocks.

use std::collections::BTreeMap;
use std::sync::Arc;

use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use super::apply::{ApplyOutcome, ApplyScreen, DoneChoice};
use super::credentials::{CredentialFlow, CredentialOutcome};
use super::events::AppEvent;
use super::screens::menu::MenuScreen;
use super::screens::review::{ReviewPhase, ReviewScreen};
use super::screens::scope::ScopeScreen;
use super::screens::service::ServiceScreen;
use super::screens::source::SourceScreen;
use super::screens::targets::TargetScreen;
use super::screens::trust::TrustScreen;
use super::screens::Hint;
use super::state::{Action, WizardState};
use super::tasks::Task;
use crate::backend::Backend;
use crate::catalog::{Catalog, Entry, EntrySource, SourceChoice};
use crate::targets::{Scope, Target};

/// Startup options for a wizard session
#[derive(Debug, Clone, Copy, Default)]
pub struct WizardOptions {
    pub registry_enabled: bool,
    /// Skip the menu and start straight into this action
    pub initial_action: Option<Action>,
}

/// The active screen and its local state
#[derive(Debug)]
pub enum Screen {
    Menu(MenuScreen),
    Source(SourceScreen),
    Service(ServiceScreen),
    Trust(TrustScreen),
    Target(TargetScreen),
    Scope(ScopeScreen),
    Review(ReviewScreen),
    Apply(ApplyScreen),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ScreenKind {
    Menu,
    Source,
    Service,
    Trust,
    Target,
    Scope,
    Review,
    Apply,
}

impl Screen {
    pub fn kind(&self) -> ScreenKind {
        match self {
            Screen::Menu(_) => ScreenKind::Menu,
            Screen::Source(_) => ScreenKind::Source,
            Screen::Service(_) => ScreenKind::Service,
            Screen::Trust(_) => ScreenKind::Trust,
            Screen::Target(_) => ScreenKind::Target,
            Screen::Scope(_) => ScreenKind::Scope,
            Screen::Review(_) => ScreenKind::Review,
            Screen::Apply(_) => ScreenKind::Apply,
        }
    }

    pub fn hints(&self) -> Vec<Hint> {
        match self {
            Screen::Menu(s) => s.hints(),
            Screen::Source(s) => s.hints(),
            Screen::Service(s) => s.hints(),
            Screen::Trust(s) => s.hints(),
            Screen::Target(s) => s.hints(),
            Screen::Scope(s) => s.hints(),
            Screen::Review(s) => s.hints(),
            Screen::Apply(s) => super::screens::apply::hints(s),
        }
    }

    fn resize(&mut self, width: u16, height: u16) {
        if let Screen::Service(s) = self {
            s.resize(width, height);
        }
    }
}

/// What a screen asks the navigator to do after handling a key
#[derive(Debug)]
pub enum Outcome {
    Back,
    Quit,
    ChooseAction(Action),
    ChooseSource(SourceChoice),
    ChooseEntry(Entry),
    Trust(bool),
    ChooseTargets(Vec<Arc<dyn Target>>),
    ChooseScope(Scope),
    Confirm,
    Credential(CredentialOutcome),
    Apply(ApplyOutcome),
}

/// One step of the breadcrumb trail
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BreadcrumbStep {
    pub label: &'static str,
    pub value: String,
    pub active: bool,
    pub completed: bool,
    pub visible: bool,
}

pub struct Wizard {
    backend: Arc<dyn Backend>,
    options: WizardOptions,
    state: WizardState,
    screen: Screen,
    /// Catalog for the current pass, keyed by the source it was loaded for
    catalog: Option<(SourceChoice, Catalog)>,
    /// A status poll is in flight; at most one runs at a time
    poll_pending: bool,
    should_quit: bool,
    tick: usize,
}

impl Wizard {
    pub fn new(backend: Arc<dyn Backend>, options: WizardOptions) -> Self {
        Self {
            backend,
            options,
            state: WizardState::default(),
            screen: Screen::Menu(MenuScreen::default()),
            catalog: None,
            poll_pending: false,
            should_quit: false,
            tick: 0,
        }
    }

    /// Tasks needed for the first screen
    pub fn start(&mut self) -> Vec<Task> {
        match self.options.initial_action {
            Some(action) => self.begin(action),
            None => Vec::new(),
        }
    }

    pub fn state(&self) -> &WizardState {
        &self.state
    }

    pub fn screen(&self) -> &Screen {
        &self.screen
    }

    pub fn kind(&self) -> ScreenKind {
        self.screen.kind()
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub fn registry_enabled(&self) -> bool {
        self.options.registry_enabled
    }

    /// Animation counter advanced on every tick
    pub fn tick(&self) -> usize {
        self.tick
    }

    /// React to one event, returning the tasks to run next
    pub fn handle(&mut self, event: AppEvent) -> Vec<Task> {
        match event {
            AppEvent::Key(key) => {
                if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
                    self.should_quit = true;
                    return Vec::new();
                }
                self.handle_key(key)
            }
            AppEvent::Resize(width, height) => {
                self.screen.resize(width, height);
                Vec::new()
            }
            AppEvent::Tick => {
                self.tick = self.tick.wrapping_add(1);
                Vec::new()
            }
            AppEvent::CatalogLoaded { source, result } => self.on_catalog_loaded(source, result),
            AppEvent::RegistryStatus(status) => self.on_registry_status(status),
            AppEvent::EntryRefreshed(result) => self.on_entry_refreshed(result),
            AppEvent::EnvPreset(preset) => self.on_env_preset(preset),
            AppEvent::CredentialStored { name, result } => {
                match result {
                    Ok(()) => tracing::debug!("Saved credential {}", name),
                    Err(e) => tracing::warn!("Could not save credential {}: {}", name, e),
                }
                Vec::new()
            }
            AppEvent::UrlOpened(result) => {
                if let Err(e) = result {
                    tracing::warn!("Could not open browser: {}", e);
                }
                Vec::new()
            }
            AppEvent::TargetApplied { index, result } => match &mut self.screen {
                Screen::Apply(apply) => apply.on_result(index, result).into_iter().collect(),
                _ => Vec::new(),
            },
            AppEvent::CredentialsRemoved(result) => {
                if let Screen::Apply(apply) = &mut self.screen {
                    apply.on_credentials_removed(result);
                }
                Vec::new()
            }
        }
    }

    fn handle_key(&mut self, key: KeyEvent) -> Vec<Task> {
        let outcome = match &mut self.screen {
            Screen::Menu(s) => s.handle_key(key),
            Screen::Source(s) => s.handle_key(key),
            Screen::Service(s) => s.handle_key(key),
            Screen::Trust(s) => s.handle_key(key),
            Screen::Target(s) => s.handle_key(key),
            Screen::Scope(s) => s.handle_key(key),
            Screen::Review(s) => s.handle_key(key),
            Screen::Apply(s) => s.handle_key(key).map(Outcome::Apply),
        };
        match outcome {
            Some(outcome) => self.apply_outcome(outcome),
            None => Vec::new(),
        }
    }

    fn apply_outcome(&mut self, outcome: Outcome) -> Vec<Task> {
        match outcome {
            Outcome::Back => self.back(),
            Outcome::Quit => {
                self.should_quit = true;
                Vec::new()
            }
            Outcome::ChooseAction(action) => self.begin(action),
            Outcome::ChooseSource(source) => {
                self.state = std::mem::take(&mut self.state).with_source(source);
                self.enter_service()
            }
            Outcome::ChooseEntry(entry) => {
                let registry = entry.source() == EntrySource::Registry;
                self.state = std::mem::take(&mut self.state).with_entry(entry.clone());
                if registry {
                    self.screen = Screen::Trust(TrustScreen::new(entry));
                    Vec::new()
                } else {
                    self.enter_targets()
                }
            }
            Outcome::Trust(true) => match &mut self.screen {
                Screen::Trust(trust) => {
                    trust.set_refreshing();
                    vec![Task::RefreshEntry(trust.entry().clone())]
                }
                _ => Vec::new(),
            },
            Outcome::Trust(false) => {
                self.state = std::mem::take(&mut self.state).without_entry();
                self.enter_service()
            }
            Outcome::ChooseTargets(targets) => {
                self.state = std::mem::take(&mut self.state).with_targets(targets);
                if self.state.scope_relevant() {
                    self.screen = Screen::Scope(ScopeScreen::new(&self.state.targets));
                    Vec::new()
                } else {
                    self.state = std::mem::take(&mut self.state).with_scope(Scope::User);
                    self.enter_review()
                }
            }
            Outcome::ChooseScope(scope) => {
                self.state = std::mem::take(&mut self.state).with_scope(scope);
                self.enter_review()
            }
            Outcome::Confirm => self.confirm_review(),
            Outcome::Credential(outcome) => self.on_credential_outcome(outcome),
            Outcome::Apply(ApplyOutcome::Task(task)) => vec![task],
            Outcome::Apply(ApplyOutcome::Choice(choice)) => match choice {
                DoneChoice::Repeat => {
                    let action = self.state.action;
                    self.begin(action)
                }
                DoneChoice::Menu => {
                    self.enter_menu();
                    Vec::new()
                }
                DoneChoice::Exit => {
                    self.should_quit = true;
                    Vec::new()
                }
            },
        }
    }

    /// Step back one screen, clearing whatever depended on the screen left
    fn back(&mut self) -> Vec<Task> {
        let state = std::mem::take(&mut self.state);
        match self.screen.kind() {
            ScreenKind::Menu => {
                self.state = state;
                Vec::new()
            }
            ScreenKind::Service if self.options.registry_enabled => {
                self.state = state.without_source();
                self.screen = Screen::Source(SourceScreen::default());
                Vec::new()
            }
            ScreenKind::Trust | ScreenKind::Target => {
                self.state = state.without_entry();
                self.enter_service()
            }
            ScreenKind::Scope => {
                self.state = state.without_scope();
                self.enter_targets()
            }
            ScreenKind::Review => {
                self.state = state.without_scope();
                if self.state.scope_relevant() {
                    self.screen = Screen::Scope(ScopeScreen::new(&self.state.targets));
                    Vec::new()
                } else {
                    self.enter_targets()
                }
            }
            ScreenKind::Source | ScreenKind::Service | ScreenKind::Apply => {
                self.enter_menu();
                Vec::new()
            }
        }
    }

    fn enter_menu(&mut self) {
        self.state = WizardState::default();
        self.catalog = None;
        self.screen = Screen::Menu(MenuScreen::default());
    }

    /// Start a fresh pass for `action`
    fn begin(&mut self, action: Action) -> Vec<Task> {
        self.state = WizardState::new(action);
        self.catalog = None;
        if self.options.registry_enabled {
            self.screen = Screen::Source(SourceScreen::default());
            Vec::new()
        } else {
            self.state = std::mem::take(&mut self.state).with_source(SourceChoice::Curated);
            self.enter_service()
        }
    }

    fn enter_service(&mut self) -> Vec<Task> {
        let source = self.state.source.unwrap_or(SourceChoice::Curated);
        if let Some((loaded, catalog)) = &self.catalog {
            if *loaded == source {
                self.screen = Screen::Service(ServiceScreen::ready(source, catalog.clone()));
                return Vec::new();
            }
        }

        self.catalog = None;
        self.screen = Screen::Service(ServiceScreen::loading(source));
        let mut tasks = vec![Task::LoadCatalog(source)];
        if source.wants_registry() && self.options.registry_enabled && !self.poll_pending {
            self.poll_pending = true;
            tasks.push(Task::PollRegistryStatus);
        }
        tasks
    }

    fn enter_targets(&mut self) -> Vec<Task> {
        self.screen = Screen::Target(TargetScreen::new(self.backend.all_targets(), &self.state.targets));
        Vec::new()
    }

    fn enter_review(&mut self) -> Vec<Task> {
        self.screen = Screen::Review(ReviewScreen::default());
        Vec::new()
    }

    fn confirm_review(&mut self) -> Vec<Task> {
        let Some(entry) = self.state.entry.clone() else {
            return Vec::new();
        };
        match self.state.action {
            Action::Install => {
                if let Screen::Review(review) = &mut self.screen {
                    review.set_phase(ReviewPhase::Checking);
                }
                vec![Task::PresetEnv(entry.env_vars())]
            }
            Action::Uninstall => self.start_apply(BTreeMap::new()),
        }
    }

    fn start_apply(&mut self, env: BTreeMap<String, String>) -> Vec<Task> {
        let Some(entry) = self.state.entry.clone() else {
            return Vec::new();
        };
        let (apply, task) =
            ApplyScreen::start(&self.state, entry, env, self.backend.can_remove_credentials());
        self.screen = Screen::Apply(apply);
        task.into_iter().collect()
    }

    fn on_catalog_loaded(&mut self, source: SourceChoice, result: Result<Catalog, String>) -> Vec<Task> {
        let Screen::Service(service) = &mut self.screen else {
            return Vec::new();
        };
        if service.source() != source || !service.is_loading() {
            return Vec::new();
        }

        match result {
            Ok(catalog) => {
                tracing::debug!("Catalog ready with {} entries", catalog.len());
                self.catalog = Some((source, catalog.clone()));
                service.set_catalog(catalog);
            }
            Err(error) => {
                tracing::warn!("Failed to load catalog: {}", error);
                service.set_error(error);
            }
        }
        Vec::new()
    }

    fn on_registry_status(&mut self, status: String) -> Vec<Task> {
        self.poll_pending = false;
        let loading = match &mut self.screen {
            Screen::Service(service) => {
                service.set_status(status.clone());
                service.is_loading()
            }
            _ => false,
        };
        if status.is_empty() && !loading {
            Vec::new()
        } else {
            self.poll_pending = true;
            vec![Task::PollRegistryStatus]
        }
    }

    fn on_entry_refreshed(&mut self, result: Result<Entry, String>) -> Vec<Task> {
        let Screen::Trust(trust) = &self.screen else {
            return Vec::new();
        };
        if !trust.is_refreshing() {
            return Vec::new();
        }

        let entry = match result {
            Ok(entry) if entry.name().to_lowercase() != trust.entry().name().to_lowercase() => {
                tracing::debug!(
                    "Dropping refresh for '{}' while confirming '{}'",
                    entry.name(),
                    trust.entry().name()
                );
                return Vec::new();
            }
            Ok(entry) => entry,
            Err(e) => {
                tracing::warn!("Keeping listed detail for '{}': {}", trust.entry().name(), e);
                trust.entry().clone()
            }
        };
        self.state = std::mem::take(&mut self.state).with_refreshed_entry(entry);
        self.enter_targets()
    }

    fn on_env_preset(&mut self, preset: BTreeMap<String, String>) -> Vec<Task> {
        let Screen::Review(review) = &mut self.screen else {
            return Vec::new();
        };
        if !review.is_checking() {
            return Vec::new();
        }
        let required = self
            .state
            .entry
            .as_ref()
            .map(Entry::required_env_vars)
            .unwrap_or_default();

        let flow = CredentialFlow::new(required, preset, self.backend.can_store_credentials());
        if flow.is_complete() {
            return self.start_apply(flow.into_resolved());
        }
        review.set_phase(ReviewPhase::Credentials(flow));
        Vec::new()
    }

    fn on_credential_outcome(&mut self, outcome: CredentialOutcome) -> Vec<Task> {
        let Screen::Review(review) = &mut self.screen else {
            return Vec::new();
        };
        match outcome {
            CredentialOutcome::Aborted => {
                review.set_phase(ReviewPhase::Summary);
                Vec::new()
            }
            CredentialOutcome::OpenUrl(url) => vec![Task::OpenUrl(url)],
            CredentialOutcome::Advanced { store } => {
                let mut tasks: Vec<Task> = store
                    .map(|(name, value)| Task::StoreCredential { name, value })
                    .into_iter()
                    .collect();
                if let Some(env) = review.take_resolved() {
                    tasks.extend(self.start_apply(env));
                }
                tasks
            }
        }
    }

    /// Trail of steps reached so far; unreached steps are hidden
    pub fn breadcrumb(&self) -> Vec<BreadcrumbStep> {
        let current = match self.screen.kind() {
            // Trust is part of picking the service
            ScreenKind::Trust => ScreenKind::Service,
            kind => kind,
        };
        let state = &self.state;

        let targets = match state.targets.len() {
            0 => String::new(),
            1 | 2 => state
                .targets
                .iter()
                .map(|t| t.name())
                .collect::<Vec<_>>()
                .join(", "),
            n => format!("{n} targets"),
        };
        let steps: [(ScreenKind, &'static str, String); 7] = [
            (ScreenKind::Menu, "Action", state.action.as_str().to_string()),
            (
                ScreenKind::Source,
                "Source",
                state.source.map(|s| s.as_str().to_string()).unwrap_or_default(),
            ),
            (
                ScreenKind::Service,
                "Service",
                state
                    .entry
                    .as_ref()
                    .map(|e| e.display_name().to_string())
                    .unwrap_or_default(),
            ),
            (ScreenKind::Target, "Targets", targets),
            (
                ScreenKind::Scope,
                "Scope",
                // User scope is implied when no target offers a choice
                state
                    .scope
                    .filter(|_| state.scope_relevant())
                    .map(|s| s.as_str().to_string())
                    .unwrap_or_default(),
            ),
            (ScreenKind::Review, "Review", "Confirmed".to_string()),
            (ScreenKind::Apply, "Apply", String::new()),
        ];

        steps
            .into_iter()
            .map(|(kind, label, value)| {
                let active = kind == current;
                let completed = kind < current && !value.is_empty();
                let hidden_source = kind == ScreenKind::Source && !self.options.registry_enabled;
                BreadcrumbStep {
                    label,
                    value,
                    active,
                    completed,
                    visible: (active || completed) && !hidden_source,
                }
            })
            .collect()
    }
}

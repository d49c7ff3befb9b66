//! Shared fixtures for the wizard integration tests
#![allow(dead_code)]

use std::collections::{BTreeMap, VecDeque};
use std::sync::{Arc, Mutex};

use mcp_wizard::backend::Backend;
use mcp_wizard::catalog::{
    resolve_server, Catalog, CuratedService, CuratedTransport, Entry, EntrySource, EnvVar,
    RegistryServer, Remote, ServerSpec, SourceChoice,
};
use mcp_wizard::cli::tui::wizard::{
    tasks, AppEvent, ApplyScreen, Screen, ScreenKind, Task, Wizard, WizardOptions,
};
use mcp_wizard::targets::{Scope, Target};
use mcp_wizard::{Result, WizardError};
use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// In-memory target that records every call
#[derive(Debug)]
pub struct FakeTarget {
    pub name: String,
    pub slug: String,
    pub installed: bool,
    pub scopes: Vec<Scope>,
    pub fail: bool,
    pub hint: String,
    pub calls: Mutex<Vec<String>>,
}

impl FakeTarget {
    pub fn new(name: &str, slug: &str, installed: bool) -> Self {
        Self {
            name: name.to_string(),
            slug: slug.to_string(),
            installed,
            scopes: Scope::ALL.to_vec(),
            fail: false,
            hint: format!("Open {name} and sign in"),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn user_only(mut self) -> Self {
        self.scopes = vec![Scope::User];
        self
    }

    pub fn failing(mut self) -> Self {
        self.fail = true;
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

impl Target for FakeTarget {
    fn name(&self) -> &str {
        &self.name
    }

    fn slug(&self) -> &str {
        &self.slug
    }

    fn is_installed(&self) -> bool {
        self.installed
    }

    fn supported_scopes(&self) -> &[Scope] {
        &self.scopes
    }

    fn install(&self, server: &ServerSpec, scope: Scope) -> Result<()> {
        if self.fail {
            return Err(WizardError::target(&self.name, "config is read-only"));
        }
        self.calls
            .lock()
            .unwrap()
            .push(format!("install {} {}", server.name, scope.as_str()));
        Ok(())
    }

    fn uninstall(&self, name: &str, scope: Scope) -> Result<()> {
        if self.fail {
            return Err(WizardError::NotFound(format!("{name} in {}", self.name)));
        }
        self.calls
            .lock()
            .unwrap()
            .push(format!("uninstall {} {}", name, scope.as_str()));
        Ok(())
    }

    fn list(&self, _scope: Scope) -> Result<Vec<String>> {
        Ok(Vec::new())
    }

    fn oauth_hint(&self) -> &str {
        &self.hint
    }
}

pub struct FakeBackend {
    pub curated: Vec<CuratedService>,
    pub registry: Vec<RegistryServer>,
    pub targets: Vec<Arc<FakeTarget>>,
    pub catalog_error: Option<String>,
    pub can_store: bool,
    pub can_remove: bool,
    pub remove_result: std::result::Result<usize, String>,
    pub preset: BTreeMap<String, String>,
    pub stored: Mutex<Vec<(String, String)>>,
    pub opened: Mutex<Vec<String>>,
}

impl Default for FakeBackend {
    fn default() -> Self {
        Self {
            curated: curated_fixture(),
            registry: vec![registry_fixture()],
            targets: vec![
                Arc::new(FakeTarget::new("Claude Code", "claude-code", true)),
                Arc::new(FakeTarget::new("Cursor", "cursor", true)),
                Arc::new(FakeTarget::new("Windsurf", "windsurf", false).user_only()),
            ],
            catalog_error: None,
            can_store: false,
            can_remove: false,
            remove_result: Ok(0),
            preset: BTreeMap::new(),
            stored: Mutex::new(Vec::new()),
            opened: Mutex::new(Vec::new()),
        }
    }
}

impl FakeBackend {
    pub fn with_targets(mut self, targets: Vec<FakeTarget>) -> Self {
        self.targets = targets.into_iter().map(Arc::new).collect();
        self
    }

    pub fn target(&self, slug: &str) -> Arc<FakeTarget> {
        self.targets
            .iter()
            .find(|t| t.slug == slug)
            .cloned()
            .unwrap_or_else(|| panic!("no fake target {slug}"))
    }
}

impl Backend for FakeBackend {
    fn load_catalog(&self, source: SourceChoice) -> Result<Catalog> {
        if let Some(error) = &self.catalog_error {
            return Err(WizardError::Registry(error.clone()));
        }
        let merged = Catalog::merge(self.curated.clone(), self.registry.clone());
        Ok(match source {
            SourceChoice::All => merged,
            SourceChoice::Curated => Catalog::from_entries(merged.by_source(EntrySource::Curated)),
            SourceChoice::Registry => Catalog::from_entries(merged.by_source(EntrySource::Registry)),
        })
    }

    fn registry_sync_status(&self) -> String {
        String::new()
    }

    fn refresh_registry_entry(&self, entry: &Entry) -> Result<Entry> {
        Ok(entry.clone())
    }

    fn install_target(
        &self,
        entry: &Entry,
        env: &BTreeMap<String, String>,
        target: &dyn Target,
        scope: Scope,
    ) -> Result<()> {
        target.install(&resolve_server(entry, env)?, scope)
    }

    fn uninstall_target(&self, name: &str, target: &dyn Target, scope: Scope) -> Result<()> {
        target.uninstall(name, scope)
    }

    fn service_uses_oauth(&self, entry: &Entry) -> bool {
        entry.curated_ref().is_some_and(|s| s.oauth)
    }

    fn oauth_manual_hint(&self, target: &dyn Target) -> String {
        target.oauth_hint().to_string()
    }

    fn can_remove_credentials(&self) -> bool {
        self.can_remove
    }

    fn remove_stored_credentials(&self, _names: &[String]) -> Result<usize> {
        self.remove_result.clone().map_err(WizardError::Credential)
    }

    fn can_store_credentials(&self) -> bool {
        self.can_store
    }

    fn store_credential(&self, name: &str, value: &str) -> Result<()> {
        self.stored
            .lock()
            .unwrap()
            .push((name.to_string(), value.to_string()));
        Ok(())
    }

    fn preset_env(&self, vars: &[EnvVar]) -> BTreeMap<String, String> {
        vars.iter()
            .filter_map(|v| self.preset.get(&v.name).map(|value| (v.name.clone(), value.clone())))
            .collect()
    }

    fn open_url(&self, url: &str) -> Result<()> {
        self.opened.lock().unwrap().push(url.to_string());
        Ok(())
    }

    fn all_targets(&self) -> Vec<Arc<dyn Target>> {
        self.targets
            .iter()
            .map(|t| t.clone() as Arc<dyn Target>)
            .collect()
    }
}

/// filesystem (no env), github (one required token), linear (OAuth over http)
pub fn curated_fixture() -> Vec<CuratedService> {
    vec![
        CuratedService {
            name: "filesystem".to_string(),
            display_name: "Filesystem".to_string(),
            description: "Read and write local files".to_string(),
            command: "npx".to_string(),
            args: vec!["-y".to_string(), "@modelcontextprotocol/server-filesystem".to_string()],
            ..Default::default()
        },
        CuratedService {
            name: "github".to_string(),
            display_name: "GitHub".to_string(),
            description: "Issues, pull requests and code search".to_string(),
            command: "npx".to_string(),
            args: vec!["-y".to_string(), "@modelcontextprotocol/server-github".to_string()],
            env: vec![EnvVar {
                name: "GITHUB_TOKEN".to_string(),
                description: "Personal access token".to_string(),
                required: true,
                setup_url: "https://github.com/settings/tokens".to_string(),
                ..Default::default()
            }],
            ..Default::default()
        },
        CuratedService {
            name: "linear".to_string(),
            display_name: "Linear".to_string(),
            description: "Project tracking".to_string(),
            transport: CuratedTransport::Http,
            url: "https://mcp.linear.app/mcp".to_string(),
            oauth: true,
            ..Default::default()
        },
    ]
}

pub fn registry_fixture() -> RegistryServer {
    RegistryServer {
        name: "io.example/weather".to_string(),
        title: Some("Weather".to_string()),
        description: "Forecasts from the example weather service".to_string(),
        version: "1.2.0".to_string(),
        remotes: vec![Remote {
            kind: "streamable-http".to_string(),
            url: "https://weather.example.io/mcp".to_string(),
            ..Default::default()
        }],
        ..Default::default()
    }
}

pub fn key(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
}

pub fn ctrl(c: char) -> KeyEvent {
    KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL)
}

/// Drives a [`Wizard`] the way the event loop does, but on the test thread
///
/// Tasks returned by the wizard are queued; [`Harness::settle`] executes them
/// in order and feeds each result back.
pub struct Harness {
    pub wizard: Wizard,
    pub backend: Arc<FakeBackend>,
    pub queue: VecDeque<Task>,
}

impl Harness {
    pub fn new(backend: FakeBackend, registry_enabled: bool) -> Self {
        Self::with_options(
            backend,
            WizardOptions {
                registry_enabled,
                initial_action: None,
            },
        )
    }

    pub fn with_options(backend: FakeBackend, options: WizardOptions) -> Self {
        let backend = Arc::new(backend);
        let shared: Arc<dyn Backend> = backend.clone();
        let mut wizard = Wizard::new(shared, options);
        let queue = wizard.start().into();
        Self {
            wizard,
            backend,
            queue,
        }
    }

    pub fn kind(&self) -> ScreenKind {
        self.wizard.kind()
    }

    /// Send an event, queueing whatever tasks it produces
    pub fn send(&mut self, event: AppEvent) {
        let tasks = self.wizard.handle(event);
        self.queue.extend(tasks);
    }

    pub fn press(&mut self, code: KeyCode) {
        self.send(AppEvent::Key(key(code)));
    }

    pub fn type_text(&mut self, text: &str) {
        for c in text.chars() {
            self.press(KeyCode::Char(c));
        }
    }

    /// Remove and return the queued tasks without running them
    pub fn take_tasks(&mut self) -> Vec<Task> {
        self.queue.drain(..).collect()
    }

    /// Run queued tasks until none remain
    pub fn settle(&mut self) {
        let mut budget = 200;
        while let Some(task) = self.queue.pop_front() {
            budget -= 1;
            assert!(budget > 0, "wizard kept issuing tasks");
            let event = tasks::execute(self.backend.as_ref(), task);
            self.send(event);
        }
    }

    pub fn press_and_settle(&mut self, code: KeyCode) {
        self.press(code);
        self.settle();
    }

    pub fn apply(&self) -> &ApplyScreen {
        match self.wizard.screen() {
            Screen::Apply(apply) => apply,
            other => panic!("expected apply screen, got {:?}", other.kind()),
        }
    }

    /// Menu → install (or uninstall) → curated list, with the catalog loaded
    pub fn open_services(&mut self, uninstall: bool) {
        self.press(KeyCode::Char(if uninstall { 'u' } else { 'i' }));
        if self.wizard.registry_enabled() {
            // Curated is the first source
            self.press(KeyCode::Enter);
        }
        self.settle();
        assert_eq!(self.kind(), ScreenKind::Service);
    }

    /// Pick the curated service whose name matches `query` and reach Review
    /// with the default target selection and user scope
    pub fn reach_review(&mut self, query: &str, uninstall: bool) {
        self.open_services(uninstall);
        self.type_text(query);
        self.press(KeyCode::Enter);
        assert_eq!(self.kind(), ScreenKind::Target);
        self.press(KeyCode::Enter);
        if self.kind() == ScreenKind::Scope {
            self.press(KeyCode::Enter);
        }
        assert_eq!(self.kind(), ScreenKind::Review);
    }
}

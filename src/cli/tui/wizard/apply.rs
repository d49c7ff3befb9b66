//! Sequential apply against the selected targets
//!
//! Targets are processed strictly one after another. A target is only marked
//! running, and its task only issued, after the previous target's result has
//! been handled. A failing target is recorded and the batch carries on.
//!
//! ```text
//! Running ──(last result)──► CredCleanup? ──► Done
//! ```
//!
//! The cleanup prompt only appears after an uninstall that fully succeeded,
//! when a credential store is available and the service declares env vars.

use std::collections::BTreeMap;
use std::sync::Arc;

use ratatui::crossterm::event::{KeyCode, KeyEvent};

use super::state::{Action, TargetResult, TargetStatus, WizardState};
use super::tasks::{ApplyTask, Task};
use crate::catalog::Entry;
use crate::targets::{Scope, Target};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyPhase {
    Running,
    /// Offer to delete stored credentials; `remove` is the highlighted answer
    CredCleanup { remove: bool, removing: bool },
    Done { cursor: usize },
}

/// Post-completion choices, in display order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DoneChoice {
    Repeat,
    Menu,
    Exit,
}

impl DoneChoice {
    pub const ALL: [DoneChoice; 3] = [DoneChoice::Repeat, DoneChoice::Menu, DoneChoice::Exit];

    pub fn label(&self, action: Action) -> &'static str {
        match (self, action) {
            (DoneChoice::Repeat, Action::Install) => "Install another server",
            (DoneChoice::Repeat, Action::Uninstall) => "Uninstall another server",
            (DoneChoice::Menu, _) => "Back to menu",
            (DoneChoice::Exit, _) => "Exit",
        }
    }
}

/// Input handled by the apply screen
#[derive(Debug, Clone)]
pub enum ApplyOutcome {
    /// Issue this task
    Task(Task),
    Choice(DoneChoice),
}

#[derive(Debug)]
pub struct ApplyScreen {
    action: Action,
    entry: Entry,
    scope: Scope,
    env: BTreeMap<String, String>,
    targets: Vec<Arc<dyn Target>>,
    results: Vec<TargetResult>,
    current: Option<usize>,
    has_failures: bool,
    phase: ApplyPhase,
    can_remove_credentials: bool,
    cleanup_message: Option<String>,
}

impl ApplyScreen {
    /// Begin applying `state` and return the first dispatch, if any
    pub fn start(
        state: &WizardState,
        entry: Entry,
        env: BTreeMap<String, String>,
        can_remove_credentials: bool,
    ) -> (Self, Option<Task>) {
        let mut screen = Self {
            action: state.action,
            entry,
            scope: state.scope.unwrap_or_default(),
            env,
            targets: state.targets.clone(),
            results: state.targets.iter().map(|t| TargetResult::pending(t.as_ref())).collect(),
            current: None,
            has_failures: false,
            phase: ApplyPhase::Running,
            can_remove_credentials,
            cleanup_message: None,
        };

        if screen.targets.is_empty() {
            screen.phase = ApplyPhase::Done { cursor: 0 };
            return (screen, None);
        }
        let task = screen.dispatch(0);
        (screen, task)
    }

    pub fn action(&self) -> Action {
        self.action
    }

    pub fn entry(&self) -> &Entry {
        &self.entry
    }

    pub fn scope(&self) -> Scope {
        self.scope
    }

    pub fn phase(&self) -> ApplyPhase {
        self.phase
    }

    pub fn results(&self) -> &[TargetResult] {
        &self.results
    }

    /// Index of the target whose task is outstanding
    pub fn current(&self) -> Option<usize> {
        self.current
    }

    pub fn has_failures(&self) -> bool {
        self.has_failures
    }

    pub fn cleanup_message(&self) -> Option<&str> {
        self.cleanup_message.as_deref()
    }

    pub fn is_running(&self) -> bool {
        self.phase == ApplyPhase::Running
    }

    /// Names offered for credential cleanup
    pub fn cleanup_names(&self) -> Vec<String> {
        self.entry.env_var_names()
    }

    pub fn header(&self) -> String {
        let failed = self
            .results
            .iter()
            .filter(|r| r.status == TargetStatus::Failed)
            .count();
        if !self.results.is_empty() && failed == self.results.len() {
            "Operation failed".to_string()
        } else if failed > 0 {
            "Completed with errors".to_string()
        } else {
            format!("{} successfully", self.action.past_tense())
        }
    }

    fn dispatch(&mut self, index: usize) -> Option<Task> {
        let target = self.targets.get(index)?.clone();
        self.results[index].status = TargetStatus::Running;
        self.current = Some(index);
        tracing::debug!("Applying to {} ({}/{})", target.name(), index + 1, self.targets.len());

        Some(Task::Apply(ApplyTask {
            index,
            action: self.action,
            entry: self.entry.clone(),
            target,
            env: self.env.clone(),
            scope: self.scope,
        }))
    }

    /// Record the result for `index` and dispatch the next target
    ///
    /// Results for anything but the outstanding target are ignored.
    pub fn on_result(&mut self, index: usize, result: Result<Option<String>, String>) -> Option<Task> {
        if self.current != Some(index) || self.phase != ApplyPhase::Running {
            tracing::debug!("Ignoring stale apply result for index {}", index);
            return None;
        }

        let row = &mut self.results[index];
        match result {
            Ok(auth_hint) => {
                row.status = TargetStatus::Done;
                row.auth_hint = auth_hint;
            }
            Err(error) => {
                tracing::warn!("{} failed on {}: {}", self.action.as_str(), row.name, error);
                row.status = TargetStatus::Failed;
                row.error = Some(error);
                self.has_failures = true;
            }
        }
        self.current = None;

        if index + 1 < self.targets.len() {
            return self.dispatch(index + 1);
        }
        self.finish();
        None
    }

    fn cleanup_offered(&self) -> bool {
        self.action == Action::Uninstall
            && !self.has_failures
            && self.can_remove_credentials
            && !self.cleanup_names().is_empty()
    }

    fn finish(&mut self) {
        self.phase = if self.cleanup_offered() {
            ApplyPhase::CredCleanup {
                remove: false,
                removing: false,
            }
        } else {
            ApplyPhase::Done { cursor: 0 }
        };
    }

    pub fn on_credentials_removed(&mut self, result: Result<usize, String>) {
        if !matches!(self.phase, ApplyPhase::CredCleanup { removing: true, .. }) {
            return;
        }
        self.cleanup_message = Some(match result {
            Ok(0) => "No stored credentials found".to_string(),
            Ok(1) => "Removed 1 stored credential".to_string(),
            Ok(n) => format!("Removed {n} stored credentials"),
            Err(error) => format!("Could not remove stored credentials: {error}"),
        });
        self.phase = ApplyPhase::Done { cursor: 0 };
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> Option<ApplyOutcome> {
        match self.phase {
            // No cancellation of in-flight work
            ApplyPhase::Running => None,
            ApplyPhase::CredCleanup { removing: true, .. } => None,
            ApplyPhase::CredCleanup { remove, .. } => match key.code {
                KeyCode::Left | KeyCode::Right | KeyCode::Up | KeyCode::Down | KeyCode::Tab => {
                    self.phase = ApplyPhase::CredCleanup {
                        remove: !remove,
                        removing: false,
                    };
                    None
                }
                KeyCode::Char('y') | KeyCode::Char('Y') => self.confirm_cleanup(true),
                KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => self.confirm_cleanup(false),
                KeyCode::Enter => self.confirm_cleanup(remove),
                _ => None,
            },
            ApplyPhase::Done { cursor } => match key.code {
                KeyCode::Up => {
                    self.phase = ApplyPhase::Done {
                        cursor: cursor.saturating_sub(1),
                    };
                    None
                }
                KeyCode::Down => {
                    self.phase = ApplyPhase::Done {
                        cursor: (cursor + 1).min(DoneChoice::ALL.len() - 1),
                    };
                    None
                }
                KeyCode::Enter => Some(ApplyOutcome::Choice(DoneChoice::ALL[cursor])),
                KeyCode::Esc => Some(ApplyOutcome::Choice(DoneChoice::Menu)),
                KeyCode::Char('q') => Some(ApplyOutcome::Choice(DoneChoice::Exit)),
                _ => None,
            },
        }
    }

    fn confirm_cleanup(&mut self, remove: bool) -> Option<ApplyOutcome> {
        if !remove {
            self.phase = ApplyPhase::Done { cursor: 0 };
            return None;
        }
        self.phase = ApplyPhase::CredCleanup {
            remove: true,
            removing: true,
        };
        Some(ApplyOutcome::Task(Task::RemoveCredentials(self.cleanup_names())))
    }
}

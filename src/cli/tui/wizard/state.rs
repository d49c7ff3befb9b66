use std::sync::Arc;

use crate::catalog::{Entry, SourceChoice};
use crate::targets::{Scope, Target};

/// What the current pass does with the chosen service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Action {
    #[default]
    Install,
    Uninstall,
}

impl Action {
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Install => "Install",
            Action::Uninstall => "Uninstall",
        }
    }

    pub fn past_tense(&self) -> &'static str {
        match self {
            Action::Install => "Installed",
            Action::Uninstall => "Uninstalled",
        }
    }
}

/// Choices accumulated over one wizard pass
///
/// Updates consume the state and return a new one. Clearing a field also
/// clears every field chosen after it.
#[derive(Debug, Clone, Default)]
pub struct WizardState {
    pub action: Action,
    pub source: Option<SourceChoice>,
    pub entry: Option<Entry>,
    pub targets: Vec<Arc<dyn Target>>,
    pub scope: Option<Scope>,
}

impl WizardState {
    pub fn new(action: Action) -> Self {
        Self {
            action,
            ..Default::default()
        }
    }

    pub fn with_action(self, action: Action) -> Self {
        Self::new(action)
    }

    pub fn with_source(self, source: SourceChoice) -> Self {
        Self {
            source: Some(source),
            ..Self::new(self.action)
        }
    }

    pub fn without_source(self) -> Self {
        Self::new(self.action)
    }

    pub fn with_entry(self, entry: Entry) -> Self {
        Self {
            entry: Some(entry),
            targets: Vec::new(),
            scope: None,
            ..self
        }
    }

    pub fn without_entry(self) -> Self {
        Self {
            entry: None,
            targets: Vec::new(),
            scope: None,
            ..self
        }
    }

    /// Swap in refreshed detail for the chosen entry without touching later choices
    pub fn with_refreshed_entry(self, entry: Entry) -> Self {
        Self {
            entry: Some(entry),
            ..self
        }
    }

    pub fn with_targets(self, targets: Vec<Arc<dyn Target>>) -> Self {
        Self {
            targets,
            scope: None,
            ..self
        }
    }

    pub fn without_targets(self) -> Self {
        self.with_targets(Vec::new())
    }

    pub fn with_scope(self, scope: Scope) -> Self {
        Self {
            scope: Some(scope),
            ..self
        }
    }

    pub fn without_scope(self) -> Self {
        Self { scope: None, ..self }
    }

    /// Any chosen target can be configured per project
    pub fn scope_relevant(&self) -> bool {
        self.targets.iter().any(|t| t.supports_scope(Scope::Project))
    }

    pub fn target_slugs(&self) -> Vec<&str> {
        self.targets.iter().map(|t| t.slug()).collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TargetStatus {
    Pending,
    Running,
    Done,
    Failed,
}

impl TargetStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, TargetStatus::Done | TargetStatus::Failed)
    }
}

/// Progress of one target during apply
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetResult {
    pub name: String,
    pub slug: String,
    pub status: TargetStatus,
    pub error: Option<String>,
    pub auth_hint: Option<String>,
}

impl TargetResult {
    pub fn pending(target: &dyn Target) -> Self {
        Self {
            name: target.name().to_string(),
            slug: target.slug().to_string(),
            status: TargetStatus::Pending,
            error: None,
            auth_hint: None,
        }
    }
}

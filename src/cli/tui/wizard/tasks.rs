//! Units of work requested by the wizard
//!
//! The navigator never calls the backend directly for anything that may
//! block. It returns [`Task`] values; the event loop runs each one on a
//! blocking worker and feeds the resulting [`AppEvent`] back in.

use std::collections::BTreeMap;
use std::sync::Arc;

use super::events::AppEvent;
use super::state::Action;
use crate::backend::Backend;
use crate::catalog::{Entry, EnvVar, SourceChoice};
use crate::targets::{Scope, Target};

/// Install or uninstall against a single target
#[derive(Debug, Clone)]
pub struct ApplyTask {
    pub index: usize,
    pub action: Action,
    pub entry: Entry,
    pub target: Arc<dyn Target>,
    pub env: BTreeMap<String, String>,
    pub scope: Scope,
}

#[derive(Debug, Clone)]
pub enum Task {
    LoadCatalog(SourceChoice),
    /// Read the registry sync status after one poll interval
    PollRegistryStatus,
    RefreshEntry(Entry),
    PresetEnv(Vec<EnvVar>),
    StoreCredential { name: String, value: String },
    OpenUrl(String),
    Apply(ApplyTask),
    RemoveCredentials(Vec<String>),
}

impl Task {
    /// Tasks that must wait a poll interval before running
    pub fn is_delayed(&self) -> bool {
        matches!(self, Task::PollRegistryStatus)
    }
}

/// Run `task` to completion on the current thread
pub fn execute(backend: &dyn Backend, task: Task) -> AppEvent {
    match task {
        Task::LoadCatalog(source) => AppEvent::CatalogLoaded {
            source,
            result: backend.load_catalog(source).map_err(|e| e.to_string()),
        },
        Task::PollRegistryStatus => AppEvent::RegistryStatus(backend.registry_sync_status()),
        Task::RefreshEntry(entry) => {
            AppEvent::EntryRefreshed(backend.refresh_registry_entry(&entry).map_err(|e| e.to_string()))
        }
        Task::PresetEnv(vars) => AppEvent::EnvPreset(backend.preset_env(&vars)),
        Task::StoreCredential { name, value } => {
            let result = backend.store_credential(&name, &value).map_err(|e| e.to_string());
            AppEvent::CredentialStored { name, result }
        }
        Task::OpenUrl(url) => AppEvent::UrlOpened(backend.open_url(&url).map_err(|e| e.to_string())),
        Task::Apply(apply) => AppEvent::TargetApplied {
            index: apply.index,
            result: apply_one(backend, &apply),
        },
        Task::RemoveCredentials(names) => AppEvent::CredentialsRemoved(
            backend.remove_stored_credentials(&names).map_err(|e| e.to_string()),
        ),
    }
}

fn apply_one(backend: &dyn Backend, task: &ApplyTask) -> Result<Option<String>, String> {
    let target = task.target.as_ref();
    match task.action {
        Action::Install => {
            backend
                .install_target(&task.entry, &task.env, target, task.scope)
                .map_err(|e| e.to_string())?;
            tracing::info!("Installed '{}' into {}", task.entry.name(), target.name());
            if !backend.service_uses_oauth(&task.entry) {
                return Ok(None);
            }
            let hint = backend.oauth_manual_hint(target);
            Ok((!hint.is_empty()).then_some(hint))
        }
        Action::Uninstall => {
            backend
                .uninstall_target(task.entry.name(), target, task.scope)
                .map_err(|e| e.to_string())?;
            tracing::info!("Uninstalled '{}' from {}", task.entry.name(), target.name());
            Ok(None)
        }
    }
}

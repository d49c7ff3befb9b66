//! Collaborators the wizard calls out to
//!
//! Every method may block (network, filesystem) and is only ever invoked from
//! a blocking worker, never from the UI loop itself. [`DefaultBackend`] wires
//! the curated list, the registry client, the JSON config targets and the
//! credential store together; tests substitute their own implementation.

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::catalog::{
    builtin_services, config_key, resolve_server, Catalog, CuratedService, Entry, EntryKind,
    EntrySource, EnvVar, RegistryClient, SourceChoice,
};
use crate::config::Settings;
use crate::credentials::FileCredentialStore;
use crate::io::WizardPaths;
use crate::targets::{Scope, Target};
use crate::Result;

pub trait Backend: Send + Sync {
    /// Merged catalog filtered to `source`
    fn load_catalog(&self, source: SourceChoice) -> Result<Catalog>;

    /// Short description of an in-progress registry sync, empty when idle
    fn registry_sync_status(&self) -> String;

    /// Latest registry detail for `entry`
    fn refresh_registry_entry(&self, entry: &Entry) -> Result<Entry>;

    fn install_target(
        &self,
        entry: &Entry,
        env: &BTreeMap<String, String>,
        target: &dyn Target,
        scope: Scope,
    ) -> Result<()>;

    fn uninstall_target(&self, name: &str, target: &dyn Target, scope: Scope) -> Result<()>;

    /// Whether the service signs in through OAuth instead of static secrets
    fn service_uses_oauth(&self, entry: &Entry) -> bool;

    fn oauth_manual_hint(&self, target: &dyn Target) -> String;

    fn can_remove_credentials(&self) -> bool;

    /// Delete stored values for `names`, returning how many existed
    fn remove_stored_credentials(&self, names: &[String]) -> Result<usize>;

    fn can_store_credentials(&self) -> bool;

    fn store_credential(&self, name: &str, value: &str) -> Result<()>;

    /// Values already available for `vars` (process environment, then the store)
    fn preset_env(&self, vars: &[EnvVar]) -> BTreeMap<String, String>;

    fn open_url(&self, url: &str) -> Result<()>;

    fn all_targets(&self) -> Vec<Arc<dyn Target>>;
}

/// Backend used by the binary
pub struct DefaultBackend {
    curated: Vec<CuratedService>,
    registry: Option<RegistryClient>,
    targets: Vec<Arc<dyn Target>>,
    store: Option<FileCredentialStore>,
}

impl DefaultBackend {
    pub fn new(settings: &Settings, paths: &WizardPaths, targets: Vec<Arc<dyn Target>>) -> Result<Self> {
        let registry = if settings.registry.enabled {
            Some(RegistryClient::new(&settings.registry, Some(paths.cache_dir.clone()))?)
        } else {
            None
        };
        let store = settings
            .credentials
            .enabled
            .then(|| FileCredentialStore::new(paths.credentials_file()));

        Ok(Self {
            curated: builtin_services()?,
            registry,
            targets,
            store,
        })
    }

    pub fn registry_enabled(&self) -> bool {
        self.registry.is_some()
    }

    /// Drop the cached registry listing so the next load hits the network
    pub fn clear_registry_cache(&self) -> Result<()> {
        match &self.registry {
            Some(client) => client.clear_cache(),
            None => Ok(()),
        }
    }
}

impl Backend for DefaultBackend {
    fn load_catalog(&self, source: SourceChoice) -> Result<Catalog> {
        let registry = match (&self.registry, source.wants_registry()) {
            (Some(client), true) => match client.servers() {
                Ok(servers) => servers,
                Err(e) if source == SourceChoice::All => {
                    tracing::warn!("Registry unavailable, showing curated services only: {}", e);
                    Vec::new()
                }
                Err(e) => return Err(e),
            },
            _ => Vec::new(),
        };

        let merged = Catalog::merge(self.curated.clone(), registry);
        tracing::debug!("Loaded {} catalog entries for {}", merged.len(), source.as_str());
        Ok(match source {
            SourceChoice::All => merged,
            SourceChoice::Curated => Catalog::from_entries(merged.by_source(EntrySource::Curated)),
            SourceChoice::Registry => Catalog::from_entries(merged.by_source(EntrySource::Registry)),
        })
    }

    fn registry_sync_status(&self) -> String {
        self.registry.as_ref().map(RegistryClient::status).unwrap_or_default()
    }

    fn refresh_registry_entry(&self, entry: &Entry) -> Result<Entry> {
        let Some(client) = &self.registry else {
            return Ok(entry.clone());
        };
        if entry.registry_ref().is_none() {
            return Ok(entry.clone());
        }

        match client.fetch_latest(entry.name()) {
            Ok(server) => Ok(Entry::registry(server)),
            Err(e) => {
                tracing::warn!("Could not refresh '{}', using cached detail: {}", entry.name(), e);
                Ok(client
                    .cached_server(entry.name())
                    .map(Entry::registry)
                    .unwrap_or_else(|| entry.clone()))
            }
        }
    }

    fn install_target(
        &self,
        entry: &Entry,
        env: &BTreeMap<String, String>,
        target: &dyn Target,
        scope: Scope,
    ) -> Result<()> {
        let server = resolve_server(entry, env)?;
        target.install(&server, effective_scope(target, scope))
    }

    fn uninstall_target(&self, name: &str, target: &dyn Target, scope: Scope) -> Result<()> {
        target.uninstall(&config_key(name), effective_scope(target, scope))
    }

    fn service_uses_oauth(&self, entry: &Entry) -> bool {
        match entry.kind() {
            EntryKind::Curated(service) => service.oauth,
            EntryKind::Registry(server) => {
                !server.remotes.is_empty() && server.packages.is_empty() && entry.env_vars().is_empty()
            }
        }
    }

    fn oauth_manual_hint(&self, target: &dyn Target) -> String {
        target.oauth_hint().to_string()
    }

    fn can_remove_credentials(&self) -> bool {
        self.store.is_some()
    }

    fn remove_stored_credentials(&self, names: &[String]) -> Result<usize> {
        match &self.store {
            Some(store) => store.remove(names),
            None => Ok(0),
        }
    }

    fn can_store_credentials(&self) -> bool {
        self.store.is_some()
    }

    fn store_credential(&self, name: &str, value: &str) -> Result<()> {
        match &self.store {
            Some(store) => store.store(name, value),
            None => Ok(()),
        }
    }

    fn preset_env(&self, vars: &[EnvVar]) -> BTreeMap<String, String> {
        let stored = match self.store.as_ref().map(FileCredentialStore::all) {
            Some(Ok(values)) => values,
            Some(Err(e)) => {
                tracing::warn!("Ignoring credential store: {}", e);
                BTreeMap::new()
            }
            None => BTreeMap::new(),
        };

        vars.iter()
            .filter_map(|var| {
                std::env::var(&var.name)
                    .ok()
                    .filter(|v| !v.is_empty())
                    .or_else(|| stored.get(&var.name).cloned())
                    .map(|value| (var.name.clone(), value))
            })
            .collect()
    }

    fn open_url(&self, url: &str) -> Result<()> {
        tracing::debug!("Opening {}", url);
        open::that(url)?;
        Ok(())
    }

    fn all_targets(&self) -> Vec<Arc<dyn Target>> {
        self.targets.clone()
    }
}

/// Project scope falls back to user scope on targets without project config
fn effective_scope(target: &dyn Target, scope: Scope) -> Scope {
    if target.supports_scope(scope) {
        scope
    } else {
        Scope::User
    }
}

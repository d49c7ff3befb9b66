//! Catalog entries and their uniform read-only view
//!
//! An [`Entry`] wraps either a curated service definition (shipped with the
//! binary) or a server record fetched from the MCP registry. Everything the
//! wizard displays or installs is read through the accessors here, so screens
//! never need to know which of the two records backs a given entry.

use serde::{Deserialize, Serialize};

/// Where a catalog entry came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntrySource {
    Curated,
    Registry,
}

impl EntrySource {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntrySource::Curated => "Curated",
            EntrySource::Registry => "Registry",
        }
    }
}

/// Which entries the user asked to browse
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceChoice {
    Curated,
    Registry,
    All,
}

impl SourceChoice {
    pub const ALL: [SourceChoice; 3] = [SourceChoice::Curated, SourceChoice::Registry, SourceChoice::All];

    pub fn as_str(&self) -> &'static str {
        match self {
            SourceChoice::Curated => "Curated",
            SourceChoice::Registry => "Registry",
            SourceChoice::All => "All",
        }
    }

    /// Whether an entry from `source` belongs to this choice
    pub fn includes(&self, source: EntrySource) -> bool {
        match self {
            SourceChoice::Curated => source == EntrySource::Curated,
            SourceChoice::Registry => source == EntrySource::Registry,
            SourceChoice::All => true,
        }
    }

    pub fn wants_registry(&self) -> bool {
        !matches!(self, SourceChoice::Curated)
    }
}

/// An environment variable a service needs at runtime
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvVar {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub setup_url: String,
    #[serde(default)]
    pub setup_hint: String,
}

/// How a curated service is reached
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CuratedTransport {
    #[default]
    Stdio,
    Http,
}

/// A hand-maintained service definition
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CuratedService {
    pub name: String,
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub transport: CuratedTransport,
    #[serde(default)]
    pub command: String,
    #[serde(default)]
    pub args: Vec<String>,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub env: Vec<EnvVar>,
    #[serde(default)]
    pub docs_url: String,
    /// Server authenticates through a browser OAuth flow after install
    #[serde(default)]
    pub oauth: bool,
}

/// A server record from the MCP registry (`server.json` shape)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistryServer {
    pub name: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub website_url: Option<String>,
    #[serde(default)]
    pub repository: Option<Repository>,
    #[serde(default)]
    pub packages: Vec<Package>,
    #[serde(default)]
    pub remotes: Vec<Remote>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Repository {
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub source: String,
}

/// A package-based install option (npm, pypi, oci, ...)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Package {
    pub registry_type: String,
    pub identifier: String,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub runtime_hint: Option<String>,
    #[serde(default)]
    pub transport: Option<PackageTransport>,
    #[serde(default)]
    pub environment_variables: Vec<KeyValueInput>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageTransport {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub url: Option<String>,
}

/// A hosted endpoint (streamable-http or sse)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Remote {
    #[serde(rename = "type")]
    pub kind: String,
    pub url: String,
    #[serde(default)]
    pub headers: Vec<KeyValueInput>,
}

/// Env var or header declaration on a package or remote
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyValueInput {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub is_required: bool,
    #[serde(default)]
    pub is_secret: bool,
    #[serde(default)]
    pub default: Option<String>,
    #[serde(default)]
    pub value: Option<String>,
}

impl KeyValueInput {
    fn to_env_var(&self) -> EnvVar {
        EnvVar {
            name: self.name.clone(),
            description: self.description.clone(),
            required: self.is_required,
            setup_url: String::new(),
            setup_hint: String::new(),
        }
    }
}

/// Backing record of an entry. Exactly one reference exists per entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryKind {
    Curated(CuratedService),
    Registry(RegistryServer),
}

/// One installable service in the catalog
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    name: String,
    kind: EntryKind,
}

impl Entry {
    pub fn curated(service: CuratedService) -> Self {
        Self {
            name: service.name.clone(),
            kind: EntryKind::Curated(service),
        }
    }

    pub fn registry(server: RegistryServer) -> Self {
        Self {
            name: server.name.clone(),
            kind: EntryKind::Registry(server),
        }
    }

    /// Merge key, compared case-insensitively
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn source(&self) -> EntrySource {
        match self.kind {
            EntryKind::Curated(_) => EntrySource::Curated,
            EntryKind::Registry(_) => EntrySource::Registry,
        }
    }

    pub fn kind(&self) -> &EntryKind {
        &self.kind
    }

    pub fn curated_ref(&self) -> Option<&CuratedService> {
        match &self.kind {
            EntryKind::Curated(service) => Some(service),
            EntryKind::Registry(_) => None,
        }
    }

    pub fn registry_ref(&self) -> Option<&RegistryServer> {
        match &self.kind {
            EntryKind::Registry(server) => Some(server),
            EntryKind::Curated(_) => None,
        }
    }

    pub fn display_name(&self) -> &str {
        let display = match &self.kind {
            EntryKind::Curated(service) => service.display_name.as_str(),
            EntryKind::Registry(server) => server.title.as_deref().unwrap_or_default(),
        };
        if display.trim().is_empty() {
            &self.name
        } else {
            display
        }
    }

    pub fn description(&self) -> &str {
        match &self.kind {
            EntryKind::Curated(service) => &service.description,
            EntryKind::Registry(server) => &server.description,
        }
    }

    pub fn version(&self) -> Option<&str> {
        match &self.kind {
            EntryKind::Curated(_) => None,
            EntryKind::Registry(server) if !server.version.is_empty() => Some(server.version.as_str()),
            EntryKind::Registry(_) => None,
        }
    }

    /// Environment variables the service declares, deduplicated by name
    ///
    /// Registry entries contribute package variables first, then remote
    /// headers that are flagged secret. Plain headers are not credentials
    /// and are left out.
    pub fn env_vars(&self) -> Vec<EnvVar> {
        let mut table = Vec::new();
        match &self.kind {
            EntryKind::Curated(service) => {
                for var in &service.env {
                    merge_env_var(&mut table, var.clone());
                }
            }
            EntryKind::Registry(server) => {
                for package in &server.packages {
                    for input in &package.environment_variables {
                        merge_env_var(&mut table, input.to_env_var());
                    }
                }
                for remote in &server.remotes {
                    for header in remote.headers.iter().filter(|h| h.is_secret) {
                        merge_env_var(&mut table, header.to_env_var());
                    }
                }
            }
        }
        table
    }

    /// Names of every declared env var, non-empty and unique
    pub fn env_var_names(&self) -> Vec<String> {
        self.env_vars().into_iter().map(|v| v.name).collect()
    }

    /// Required variables only, in declaration order
    pub fn required_env_vars(&self) -> Vec<EnvVar> {
        self.env_vars().into_iter().filter(|v| v.required).collect()
    }

    /// Transport label shown to the user ("stdio", "http", "streamable-http", ...)
    pub fn transport(&self) -> &str {
        match &self.kind {
            EntryKind::Curated(service) => match service.transport {
                CuratedTransport::Stdio => "stdio",
                CuratedTransport::Http => "http",
            },
            EntryKind::Registry(server) => {
                if let Some(remote) = server.remotes.first() {
                    remote.kind.as_str()
                } else {
                    server
                        .packages
                        .iter()
                        .find_map(|p| p.transport.as_ref().map(|t| t.kind.as_str()))
                        .unwrap_or_default()
                }
            }
        }
    }

    pub fn install_type(&self) -> &'static str {
        let (remote, package) = match &self.kind {
            EntryKind::Curated(service) => (
                service.transport == CuratedTransport::Http,
                service.transport == CuratedTransport::Stdio,
            ),
            EntryKind::Registry(server) => (!server.remotes.is_empty(), !server.packages.is_empty()),
        };
        match (remote, package) {
            (true, true) => "remote/package",
            (true, false) => "remote",
            (false, true) => "package",
            (false, false) => "",
        }
    }

    /// Unique package registry types in first-seen order, `None` without packages
    pub fn package_types(&self) -> Option<Vec<String>> {
        let server = self.registry_ref()?;
        if server.packages.is_empty() {
            return None;
        }
        let mut types: Vec<String> = Vec::new();
        for package in &server.packages {
            if !types.iter().any(|t| t == &package.registry_type) {
                types.push(package.registry_type.clone());
            }
        }
        Some(types)
    }

    pub fn docs_url(&self) -> Option<&str> {
        match &self.kind {
            EntryKind::Curated(service) if !service.docs_url.is_empty() => Some(service.docs_url.as_str()),
            EntryKind::Curated(_) => None,
            EntryKind::Registry(server) => server.website_url.as_deref().filter(|u| !u.is_empty()),
        }
    }

    pub fn repository_url(&self) -> Option<&str> {
        self.registry_ref()
            .and_then(|s| s.repository.as_ref())
            .map(|r| r.url.as_str())
            .filter(|u| !u.is_empty())
    }

    pub fn remote_urls(&self) -> Vec<&str> {
        match &self.kind {
            EntryKind::Curated(service) if service.transport == CuratedTransport::Http => {
                vec![service.url.as_str()]
            }
            EntryKind::Curated(_) => Vec::new(),
            EntryKind::Registry(server) => server.remotes.iter().map(|r| r.url.as_str()).collect(),
        }
    }
}

/// Insert `var` into `table`, merging with an existing entry of the same name
///
/// On a duplicate, `required` is OR-combined and an empty description is
/// filled from the newcomer. Empty names are dropped.
pub fn merge_env_var(table: &mut Vec<EnvVar>, var: EnvVar) {
    if var.name.is_empty() {
        return;
    }
    match table.iter_mut().find(|existing| existing.name == var.name) {
        Some(existing) => {
            existing.required |= var.required;
            if existing.description.is_empty() {
                existing.description = var.description;
            }
            if existing.setup_url.is_empty() {
                existing.setup_url = var.setup_url;
            }
            if existing.setup_hint.is_empty() {
                existing.setup_hint = var.setup_hint;
            }
        }
        None => table.push(var),
    }
}

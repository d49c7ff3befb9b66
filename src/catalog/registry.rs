//! MCP registry client
//!
//! Fetches community server definitions from an MCP registry and caches the
//! listing on disk with a TTL to avoid paging through the API on every run.
//! While a sync is underway a short status line is published for the UI to
//! poll; it is empty whenever the client is idle.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use super::entry::RegistryServer;
use crate::config::RegistrySettings;
use crate::{Result, WizardError};

const USER_AGENT: &str = concat!("mcp-wizard/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Deserialize)]
struct ServerListResponse {
    #[serde(default)]
    servers: Vec<ServerResponse>,
    #[serde(default)]
    metadata: Option<ListMetadata>,
}

#[derive(Debug, Deserialize)]
struct ServerResponse {
    server: RegistryServer,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListMetadata {
    #[serde(default)]
    next_cursor: Option<String>,
}

/// Cached registry listing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CachedServers {
    /// When the listing was cached (Unix timestamp)
    pub cached_at: i64,

    /// Registry base URL the listing came from
    pub url: String,

    pub servers: Vec<RegistryServer>,
}

/// Blocking client for one registry
pub struct RegistryClient {
    base_url: String,
    client: reqwest::blocking::Client,
    cache_dir: Option<PathBuf>,
    cache_ttl: Duration,
    page_limit: usize,
    max_pages: usize,
    status: Arc<Mutex<String>>,
}

impl RegistryClient {
    pub fn new(settings: &RegistrySettings, cache_dir: Option<PathBuf>) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(USER_AGENT)
            .connect_timeout(Duration::from_secs(10))
            .timeout(Duration::from_secs(30))
            .build()?;

        Ok(Self {
            base_url: settings.url.trim_end_matches('/').to_string(),
            client,
            cache_dir,
            cache_ttl: Duration::from_secs(settings.cache_ttl_secs),
            page_limit: settings.page_limit.max(1),
            max_pages: settings.max_pages.max(1),
            status: Arc::new(Mutex::new(String::new())),
        })
    }

    /// Current sync status, empty when idle
    pub fn status(&self) -> String {
        self.status.lock().map(|s| s.clone()).unwrap_or_default()
    }

    fn set_status(&self, status: impl Into<String>) {
        if let Ok(mut guard) = self.status.lock() {
            *guard = status.into();
        }
    }

    /// Registry servers from the cache, or from the network when the cache is stale
    pub fn servers(&self) -> Result<Vec<RegistryServer>> {
        if let Some(cached) = self.load_cached()? {
            return Ok(cached);
        }

        let result = self.fetch_all();
        self.set_status("");
        let servers = result?;

        if let Err(e) = self.save_to_cache(&servers) {
            tracing::warn!("Failed to cache registry listing: {}", e);
        }
        Ok(servers)
    }

    /// Page through the registry listing
    pub fn fetch_all(&self) -> Result<Vec<RegistryServer>> {
        let mut servers: Vec<RegistryServer> = Vec::new();
        let mut cursor: Option<String> = None;

        for page in 1..=self.max_pages {
            self.set_status(format!("Syncing registry (page {page})…"));

            let mut request = self
                .client
                .get(format!("{}/v0/servers", self.base_url))
                .query(&[("limit", self.page_limit.to_string()), ("version", "latest".to_string())]);
            if let Some(cursor) = &cursor {
                request = request.query(&[("cursor", cursor)]);
            }

            let response: ServerListResponse = request.send()?.error_for_status()?.json()?;
            tracing::debug!("Registry page {} returned {} servers", page, response.servers.len());

            for item in response.servers {
                if !servers.iter().any(|s| s.name == item.server.name) {
                    servers.push(item.server);
                }
            }

            cursor = response
                .metadata
                .and_then(|m| m.next_cursor)
                .filter(|c| !c.is_empty());
            if cursor.is_none() {
                break;
            }
        }

        Ok(servers)
    }

    /// Re-fetch the latest definition of a single server
    pub fn fetch_latest(&self, name: &str) -> Result<RegistryServer> {
        let url = format!(
            "{}/v0/servers/{}/versions/latest",
            self.base_url,
            urlencoding::encode(name)
        );
        let response = self.client.get(&url).send()?;
        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(WizardError::NotFound(format!("registry server '{name}'")));
        }
        let body: ServerResponse = response.error_for_status()?.json()?;
        Ok(body.server)
    }

    /// Get cache file path for this registry
    fn cache_path(&self) -> Option<PathBuf> {
        use std::collections::hash_map::DefaultHasher;
        use std::hash::{Hash, Hasher};

        let mut hasher = DefaultHasher::new();
        self.base_url.hash(&mut hasher);
        let hash = hasher.finish();

        self.cache_dir
            .as_ref()
            .map(|dir| dir.join(format!("registry_{hash:016x}.json")))
    }

    /// Load cached listing if still fresh
    fn load_cached(&self) -> Result<Option<Vec<RegistryServer>>> {
        let Some(cache_path) = self.cache_path() else {
            return Ok(None);
        };
        if !cache_path.exists() {
            return Ok(None);
        }

        let cached = match read_cache(&cache_path) {
            Ok(cached) => cached,
            Err(e) => {
                tracing::warn!("Ignoring unreadable registry cache {}: {}", cache_path.display(), e);
                return Ok(None);
            }
        };

        let age = chrono::Utc::now().timestamp().saturating_sub(cached.cached_at).max(0) as u64;
        let age = Duration::from_secs(age);
        if age > self.cache_ttl || cached.url != self.base_url {
            tracing::debug!("Registry cache expired for {} (age: {:?})", self.base_url, age);
            return Ok(None);
        }

        tracing::debug!("Using cached registry listing for {} (age: {:?})", self.base_url, age);
        Ok(Some(cached.servers))
    }

    /// Find a server in the cached listing regardless of age
    pub fn cached_server(&self, name: &str) -> Option<RegistryServer> {
        let cached = read_cache(&self.cache_path()?).ok()?;
        cached
            .servers
            .into_iter()
            .find(|s| s.name.eq_ignore_ascii_case(name))
    }

    fn save_to_cache(&self, servers: &[RegistryServer]) -> Result<()> {
        let Some(cache_path) = self.cache_path() else {
            return Ok(());
        };
        if let Some(parent) = cache_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let cached = CachedServers {
            cached_at: chrono::Utc::now().timestamp(),
            url: self.base_url.clone(),
            servers: servers.to_vec(),
        };
        std::fs::write(&cache_path, serde_json::to_string(&cached)?)?;

        tracing::debug!("Saved registry listing to cache: {}", cache_path.display());
        Ok(())
    }

    /// Remove the cached listing
    pub fn clear_cache(&self) -> Result<()> {
        if let Some(cache_path) = self.cache_path() {
            if cache_path.exists() {
                std::fs::remove_file(&cache_path)?;
            }
        }
        Ok(())
    }
}

fn read_cache(path: &Path) -> Result<CachedServers> {
    let content = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

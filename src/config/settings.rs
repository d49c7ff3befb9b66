//! User settings (`settings.yaml`)

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::{Result, WizardError};

/// Default MCP registry
pub const DEFAULT_REGISTRY_URL: &str = "https://registry.modelcontextprotocol.io";

/// Default registry cache TTL (15 minutes)
pub const DEFAULT_CACHE_TTL_SECS: u64 = 15 * 60;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistrySettings {
    /// Offer registry servers at all
    pub enabled: bool,
    /// Registry base URL
    pub url: String,
    pub cache_ttl_secs: u64,
    /// Servers requested per page
    pub page_limit: usize,
    /// Upper bound on pages fetched per sync
    pub max_pages: usize,
}

impl Default for RegistrySettings {
    fn default() -> Self {
        Self {
            enabled: true,
            url: DEFAULT_REGISTRY_URL.to_string(),
            cache_ttl_secs: DEFAULT_CACHE_TTL_SECS,
            page_limit: 100,
            max_pages: 20,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CredentialSettings {
    /// Offer to save entered secrets and to clean them up after uninstall
    pub enabled: bool,
}

impl Default for CredentialSettings {
    fn default() -> Self {
        Self { enabled: true }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub registry: RegistrySettings,
    pub credentials: CredentialSettings,
    /// How often the UI polls registry sync status
    pub poll_interval_ms: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            registry: RegistrySettings::default(),
            credentials: CredentialSettings::default(),
            poll_interval_ms: 400,
        }
    }
}

impl Settings {
    /// Parse settings from a YAML string
    pub fn from_yaml(content: &str) -> Result<Self> {
        let settings: Settings = serde_yaml_ng::from_str(content)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load settings, falling back to defaults when the file does not exist
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!("No settings at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content).map_err(|e| {
            WizardError::Config(format!("Failed to parse settings {}: {}", path.display(), e))
        })
    }

    fn validate(&self) -> Result<()> {
        if self.registry.enabled && self.registry.url.trim().is_empty() {
            return Err(WizardError::Config(
                "registry.url must be set when the registry is enabled".to_string(),
            ));
        }
        if self.poll_interval_ms == 0 {
            return Err(WizardError::Config(
                "poll_interval_ms must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

//! File-backed credential store
//!
//! Secrets are kept as a flat JSON object (`{"GITHUB_TOKEN": "..."}`) in the
//! wizard's config directory. On unix the file is restricted to the owner.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::{Result, WizardError};

#[derive(Debug, Clone)]
pub struct FileCredentialStore {
    path: PathBuf,
}

impl FileCredentialStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<BTreeMap<String, String>> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }
        let content = fs::read_to_string(&self.path)?;
        if content.trim().is_empty() {
            return Ok(BTreeMap::new());
        }
        serde_json::from_str(&content).map_err(|e| {
            WizardError::Credential(format!("{} is corrupted: {}", self.path.display(), e))
        })
    }

    fn save(&self, values: &BTreeMap<String, String>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, serde_json::to_string_pretty(values)?)?;
        restrict_permissions(&self.path)?;
        Ok(())
    }

    pub fn get(&self, name: &str) -> Result<Option<String>> {
        Ok(self.load()?.get(name).cloned())
    }

    /// Every stored credential
    pub fn all(&self) -> Result<BTreeMap<String, String>> {
        self.load()
    }

    /// Store or replace one credential
    pub fn store(&self, name: &str, value: &str) -> Result<()> {
        if name.trim().is_empty() {
            return Err(WizardError::Credential("credential name is empty".to_string()));
        }
        if value.is_empty() {
            return Err(WizardError::Credential(format!("no value given for {name}")));
        }

        let mut values = self.load()?;
        values.insert(name.to_string(), value.to_string());
        self.save(&values)?;
        tracing::debug!("Stored credential {}", name);
        Ok(())
    }

    /// Remove the named credentials, returning how many were present
    pub fn remove(&self, names: &[String]) -> Result<usize> {
        let mut values = self.load()?;
        let removed = names
            .iter()
            .filter(|name| values.remove(name.as_str()).is_some())
            .count();
        if removed > 0 {
            self.save(&values)?;
        }
        tracing::debug!("Removed {} of {} credentials", removed, names.len());
        Ok(removed)
    }
}

#[cfg(unix)]
fn restrict_permissions(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(0o600))?;
    Ok(())
}

#[cfg(not(unix))]
fn restrict_permissions(_path: &Path) -> Result<()> {
    Ok(())
}

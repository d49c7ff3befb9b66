use crate::{Result, WizardError};
use directories::{BaseDirs, ProjectDirs};
use std::path::{Path, PathBuf};

/// Path management for mcp-wizard's own files
#[derive(Debug, Clone)]
pub struct WizardPaths {
    /// Configuration directory (settings.yaml, credentials.json)
    pub config_dir: PathBuf,
    /// Cache directory (registry listings)
    pub cache_dir: PathBuf,
    /// State directory (log file)
    pub state_dir: PathBuf,
}

impl WizardPaths {
    /// Create new paths instance using standard directories
    pub fn new() -> Result<Self> {
        let dirs = ProjectDirs::from("", "", "mcp-wizard").ok_or_else(|| {
            WizardError::Path("Failed to determine project directories".to_string())
        })?;

        let state_dir = dirs
            .state_dir()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| dirs.data_local_dir().to_path_buf());

        Ok(Self {
            config_dir: dirs.config_dir().to_path_buf(),
            cache_dir: dirs.cache_dir().to_path_buf(),
            state_dir,
        })
    }

    /// Paths rooted in a single directory, used by tests
    pub fn rooted_at(root: &Path) -> Self {
        Self {
            config_dir: root.to_path_buf(),
            cache_dir: root.join("cache"),
            state_dir: root.join("state"),
        }
    }

    pub fn settings_file(&self) -> PathBuf {
        self.config_dir.join("settings.yaml")
    }

    pub fn credentials_file(&self) -> PathBuf {
        self.config_dir.join("credentials.json")
    }

    pub fn log_file(&self) -> PathBuf {
        self.state_dir.join("mcp-wizard.log")
    }

    /// Ensure all directories exist
    pub fn ensure_directories(&self) -> Result<()> {
        std::fs::create_dir_all(&self.config_dir)?;
        std::fs::create_dir_all(&self.cache_dir)?;
        std::fs::create_dir_all(&self.state_dir)?;
        Ok(())
    }
}

/// The user's home directory
pub fn home_dir() -> Result<PathBuf> {
    BaseDirs::new()
        .map(|dirs| dirs.home_dir().to_path_buf())
        .ok_or_else(|| WizardError::Path("Failed to determine home directory".to_string()))
}

/// Platform config directory (`~/.config`, `~/Library/Application Support`, `%APPDATA%`)
pub fn platform_config_dir() -> Result<PathBuf> {
    BaseDirs::new()
        .map(|dirs| dirs.config_dir().to_path_buf())
        .ok_or_else(|| WizardError::Path("Failed to determine config directory".to_string()))
}

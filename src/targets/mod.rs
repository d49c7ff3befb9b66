//! Install targets - AI tools whose config stores can hold MCP servers

mod json_config;
mod known;

pub use json_config::{HttpStyle, JsonConfigTarget};
pub use known::known_targets;

use std::fmt;

use crate::catalog::ServerSpec;
use crate::Result;

/// Where a server definition is placed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Scope {
    /// Global, per-user configuration
    #[default]
    User,
    /// Directory-local configuration for the current project
    Project,
}

impl Scope {
    pub const ALL: [Scope; 2] = [Scope::User, Scope::Project];

    pub fn as_str(&self) -> &'static str {
        match self {
            Scope::User => "User",
            Scope::Project => "Project",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Scope::User => "available in every project",
            Scope::Project => "only for the current directory",
        }
    }
}

/// An installable destination for MCP server definitions
pub trait Target: Send + Sync + fmt::Debug {
    /// Human readable name ("Claude Code")
    fn name(&self) -> &str;

    /// Stable identifier ("claude-code")
    fn slug(&self) -> &str;

    /// Whether the tool appears to be present on this machine
    fn is_installed(&self) -> bool;

    fn supported_scopes(&self) -> &[Scope];

    fn supports_scope(&self, scope: Scope) -> bool {
        self.supported_scopes().contains(&scope)
    }

    /// Add or replace a server definition
    fn install(&self, server: &ServerSpec, scope: Scope) -> Result<()>;

    /// Remove a server definition by config key
    fn uninstall(&self, name: &str, scope: Scope) -> Result<()>;

    /// Config keys of every server currently defined
    fn list(&self, scope: Scope) -> Result<Vec<String>>;

    /// Manual step needed to finish an OAuth sign-in, empty when none
    fn oauth_hint(&self) -> &str {
        ""
    }
}

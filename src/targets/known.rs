use std::path::Path;
use std::sync::Arc;

use super::{HttpStyle, JsonConfigTarget, Target};

/// Every tool the wizard knows how to configure
///
/// `home` is the user's home directory, `project` the working directory used
/// for project scope and `platform_config` the OS config root (where Claude
/// Desktop keeps its settings).
pub fn known_targets(home: &Path, project: &Path, platform_config: &Path) -> Vec<Arc<dyn Target>> {
    vec![
        Arc::new(
            JsonConfigTarget::new(
                "Claude Code",
                "claude-code",
                home.join(".claude.json"),
                home.join(".claude"),
                HttpStyle::Typed,
            )
            .with_project_path(project.join(".mcp.json"))
            .with_oauth_hint("Run /mcp inside Claude Code and choose Authenticate"),
        ),
        Arc::new(
            JsonConfigTarget::new(
                "Cursor",
                "cursor",
                home.join(".cursor/mcp.json"),
                home.join(".cursor"),
                HttpStyle::Url,
            )
            .with_project_path(project.join(".cursor/mcp.json"))
            .with_oauth_hint("Open Cursor Settings > MCP and click Connect"),
        ),
        Arc::new(
            JsonConfigTarget::new(
                "Gemini CLI",
                "gemini-cli",
                home.join(".gemini/settings.json"),
                home.join(".gemini"),
                HttpStyle::HttpUrl,
            )
            .with_project_path(project.join(".gemini/settings.json"))
            .with_oauth_hint("Run /mcp auth inside Gemini CLI"),
        ),
        Arc::new(
            JsonConfigTarget::new(
                "Windsurf",
                "windsurf",
                home.join(".codeium/windsurf/mcp_config.json"),
                home.join(".codeium/windsurf"),
                HttpStyle::ServerUrl,
            )
            .with_oauth_hint("Open Windsurf's MCP panel and sign in"),
        ),
        Arc::new(
            JsonConfigTarget::new(
                "Claude Desktop",
                "claude-desktop",
                platform_config.join("Claude/claude_desktop_config.json"),
                platform_config.join("Claude"),
                HttpStyle::McpRemote,
            )
            .with_oauth_hint("Restart Claude Desktop; a browser window opens to sign in"),
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::targets::Scope;

    #[test]
    fn test_slugs_are_unique() {
        let temp = tempfile::tempdir().unwrap();
        let targets = known_targets(temp.path(), temp.path(), temp.path());
        let mut slugs: Vec<&str> = targets.iter().map(|t| t.slug()).collect();
        slugs.sort();
        slugs.dedup();
        assert_eq!(slugs.len(), targets.len());
    }

    #[test]
    fn test_detection_follows_home_layout() {
        let temp = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(temp.path().join(".cursor")).unwrap();

        let targets = known_targets(temp.path(), temp.path(), temp.path());
        let installed: Vec<&str> = targets
            .iter()
            .filter(|t| t.is_installed())
            .map(|t| t.slug())
            .collect();
        assert_eq!(installed, vec!["cursor"]);
    }

    #[test]
    fn test_desktop_tools_are_user_scope_only() {
        let temp = tempfile::tempdir().unwrap();
        for target in known_targets(temp.path(), temp.path(), temp.path()) {
            assert!(target.supports_scope(Scope::User));
            let project = matches!(target.slug(), "claude-code" | "cursor" | "gemini-cli");
            assert_eq!(target.supports_scope(Scope::Project), project, "{}", target.slug());
            assert!(!target.oauth_hint().is_empty());
        }
    }
}

//! Targets backed by a JSON file with an `mcpServers` map

use serde_json::{json, Map, Value};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use super::{Scope, Target};
use crate::catalog::{ServerConfig, ServerSpec};
use crate::{Result, WizardError};

/// How a tool expects remote (HTTP) servers to be written
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpStyle {
    /// `{"type": "http", "url": ..., "headers": ...}`
    Typed,
    /// `{"url": ..., "headers": ...}`
    Url,
    /// `{"httpUrl": ..., "headers": ...}`
    HttpUrl,
    /// `{"serverUrl": ..., "headers": ...}`
    ServerUrl,
    /// stdio only: bridged through `npx mcp-remote`
    McpRemote,
}

/// A tool whose MCP servers live in a JSON config file
#[derive(Debug, Clone)]
pub struct JsonConfigTarget {
    name: String,
    slug: String,
    user_path: PathBuf,
    project_path: Option<PathBuf>,
    /// Presence of this path means the tool is installed
    detect_path: PathBuf,
    http_style: HttpStyle,
    scopes: Vec<Scope>,
    oauth_hint: String,
}

impl JsonConfigTarget {
    pub fn new(
        name: impl Into<String>,
        slug: impl Into<String>,
        user_path: PathBuf,
        detect_path: PathBuf,
        http_style: HttpStyle,
    ) -> Self {
        Self {
            name: name.into(),
            slug: slug.into(),
            user_path,
            project_path: None,
            detect_path,
            http_style,
            scopes: vec![Scope::User],
            oauth_hint: String::new(),
        }
    }

    /// Also support project scope, stored at `path`
    pub fn with_project_path(mut self, path: PathBuf) -> Self {
        self.project_path = Some(path);
        self.scopes = vec![Scope::User, Scope::Project];
        self
    }

    pub fn with_oauth_hint(mut self, hint: impl Into<String>) -> Self {
        self.oauth_hint = hint.into();
        self
    }

    /// Config file for `scope`; user-only targets always use the user file
    pub fn config_path(&self, scope: Scope) -> &Path {
        match (scope, &self.project_path) {
            (Scope::Project, Some(path)) => path,
            _ => &self.user_path,
        }
    }

    fn read_document(&self, path: &Path) -> Result<Value> {
        if !path.exists() {
            return Ok(json!({}));
        }
        let content = fs::read_to_string(path)?;
        if content.trim().is_empty() {
            return Ok(json!({}));
        }
        let document: Value = serde_json::from_str(&content).map_err(|e| {
            WizardError::target(&self.name, format!("{} is not valid JSON: {}", path.display(), e))
        })?;
        if !document.is_object() {
            return Err(WizardError::target(
                &self.name,
                format!("{} does not contain a JSON object", path.display()),
            ));
        }
        Ok(document)
    }

    fn write_document(&self, path: &Path, document: &Value) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(document)?;
        let mut file = fs::File::create(path)?;
        file.write_all(content.as_bytes())?;
        file.write_all(b"\n")?;
        Ok(())
    }

    fn server_value(&self, config: &ServerConfig) -> Value {
        match config {
            ServerConfig::Stdio { command, args, env } => {
                let mut value = Map::new();
                if self.http_style == HttpStyle::Typed {
                    value.insert("type".to_string(), json!("stdio"));
                }
                value.insert("command".to_string(), json!(command));
                value.insert("args".to_string(), json!(args));
                if !env.is_empty() {
                    value.insert("env".to_string(), json!(env));
                }
                Value::Object(value)
            }
            ServerConfig::Http { url, transport, headers } => {
                let mut value = Map::new();
                match self.http_style {
                    HttpStyle::Typed => {
                        let kind = if transport == "sse" { "sse" } else { "http" };
                        value.insert("type".to_string(), json!(kind));
                        value.insert("url".to_string(), json!(url));
                    }
                    HttpStyle::Url => {
                        value.insert("url".to_string(), json!(url));
                    }
                    HttpStyle::HttpUrl => {
                        let key = if transport == "sse" { "url" } else { "httpUrl" };
                        value.insert(key.to_string(), json!(url));
                    }
                    HttpStyle::ServerUrl => {
                        value.insert("serverUrl".to_string(), json!(url));
                    }
                    HttpStyle::McpRemote => {
                        let mut args = vec!["-y".to_string(), "mcp-remote".to_string(), url.clone()];
                        for (name, header) in headers {
                            args.push("--header".to_string());
                            args.push(format!("{name}: {header}"));
                        }
                        value.insert("command".to_string(), json!("npx"));
                        value.insert("args".to_string(), json!(args));
                        return Value::Object(value);
                    }
                }
                if !headers.is_empty() {
                    value.insert("headers".to_string(), json!(headers));
                }
                Value::Object(value)
            }
        }
    }
}

impl Target for JsonConfigTarget {
    fn name(&self) -> &str {
        &self.name
    }

    fn slug(&self) -> &str {
        &self.slug
    }

    fn is_installed(&self) -> bool {
        self.detect_path.exists()
    }

    fn supported_scopes(&self) -> &[Scope] {
        &self.scopes
    }

    fn install(&self, server: &ServerSpec, scope: Scope) -> Result<()> {
        let path = self.config_path(scope).to_path_buf();
        let mut document = self.read_document(&path)?;

        let servers = document
            .as_object_mut()
            .map(|root| root.entry("mcpServers").or_insert_with(|| json!({})))
            .and_then(Value::as_object_mut)
            .ok_or_else(|| {
                WizardError::target(&self.name, format!("mcpServers in {} is not an object", path.display()))
            })?;
        servers.insert(server.name.clone(), self.server_value(&server.config));

        self.write_document(&path, &document)?;
        tracing::info!("Wrote '{}' to {} ({})", server.name, self.name, path.display());
        Ok(())
    }

    fn uninstall(&self, name: &str, scope: Scope) -> Result<()> {
        let path = self.config_path(scope).to_path_buf();
        let mut document = self.read_document(&path)?;

        let removed = document
            .get_mut("mcpServers")
            .and_then(Value::as_object_mut)
            .and_then(|servers| servers.remove(name));
        if removed.is_none() {
            return Err(WizardError::NotFound(format!(
                "'{}' is not configured in {} ({})",
                name,
                self.name,
                path.display()
            )));
        }

        self.write_document(&path, &document)?;
        tracing::info!("Removed '{}' from {} ({})", name, self.name, path.display());
        Ok(())
    }

    fn list(&self, scope: Scope) -> Result<Vec<String>> {
        let document = self.read_document(self.config_path(scope))?;
        let mut names: Vec<String> = document
            .get("mcpServers")
            .and_then(Value::as_object)
            .map(|servers| servers.keys().cloned().collect())
            .unwrap_or_default();
        names.sort();
        Ok(names)
    }

    fn oauth_hint(&self) -> &str {
        &self.oauth_hint
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn target(dir: &Path, style: HttpStyle) -> JsonConfigTarget {
        JsonConfigTarget::new(
            "Test Tool",
            "test-tool",
            dir.join("user.json"),
            dir.to_path_buf(),
            style,
        )
        .with_project_path(dir.join("project/.mcp.json"))
    }

    fn stdio_spec() -> ServerSpec {
        ServerSpec {
            name: "github".to_string(),
            config: ServerConfig::Stdio {
                command: "npx".to_string(),
                args: vec!["-y".to_string(), "server-github".to_string()],
                env: BTreeMap::from([("TOKEN".to_string(), "t".to_string())]),
            },
        }
    }

    #[test]
    fn test_install_preserves_unrelated_keys() {
        let temp = tempfile::tempdir().unwrap();
        let target = target(temp.path(), HttpStyle::Typed);
        fs::write(
            temp.path().join("user.json"),
            r#"{"theme": "dark", "mcpServers": {"other": {"command": "x"}}}"#,
        )
        .unwrap();

        target.install(&stdio_spec(), Scope::User).unwrap();

        let content = fs::read_to_string(temp.path().join("user.json")).unwrap();
        let document: Value = serde_json::from_str(&content).unwrap();
        assert_eq!(document["theme"], "dark");
        assert_eq!(document["mcpServers"]["github"]["type"], "stdio");
        assert_eq!(document["mcpServers"]["github"]["env"]["TOKEN"], "t");
        assert_eq!(target.list(Scope::User).unwrap(), vec!["github", "other"]);
    }

    #[test]
    fn test_project_scope_writes_project_file() {
        let temp = tempfile::tempdir().unwrap();
        let target = target(temp.path(), HttpStyle::Url);

        target.install(&stdio_spec(), Scope::Project).unwrap();

        assert!(temp.path().join("project/.mcp.json").exists());
        assert!(!temp.path().join("user.json").exists());
        assert_eq!(target.list(Scope::Project).unwrap(), vec!["github"]);
    }

    #[test]
    fn test_uninstall_missing_server_fails() {
        let temp = tempfile::tempdir().unwrap();
        let target = target(temp.path(), HttpStyle::Url);

        assert!(target.uninstall("github", Scope::User).is_err());

        target.install(&stdio_spec(), Scope::User).unwrap();
        target.uninstall("github", Scope::User).unwrap();
        assert!(target.list(Scope::User).unwrap().is_empty());
    }

    #[test]
    fn test_invalid_json_is_not_overwritten() {
        let temp = tempfile::tempdir().unwrap();
        let target = target(temp.path(), HttpStyle::Url);
        fs::write(temp.path().join("user.json"), "{ not json").unwrap();

        assert!(target.install(&stdio_spec(), Scope::User).is_err());
        let content = fs::read_to_string(temp.path().join("user.json")).unwrap();
        assert_eq!(content, "{ not json");
    }

    #[test]
    fn test_http_styles() {
        let temp = tempfile::tempdir().unwrap();
        let config = ServerConfig::Http {
            url: "https://mcp.example.com/mcp".to_string(),
            transport: "streamable-http".to_string(),
            headers: BTreeMap::new(),
        };

        let typed = target(temp.path(), HttpStyle::Typed).server_value(&config);
        assert_eq!(typed["type"], "http");
        assert_eq!(typed["url"], "https://mcp.example.com/mcp");

        let gemini = target(temp.path(), HttpStyle::HttpUrl).server_value(&config);
        assert_eq!(gemini["httpUrl"], "https://mcp.example.com/mcp");

        let bridged = target(temp.path(), HttpStyle::McpRemote).server_value(&config);
        assert_eq!(bridged["command"], "npx");
        assert_eq!(bridged["args"][1], "mcp-remote");
    }

    #[test]
    fn test_user_only_target_ignores_project_scope() {
        let temp = tempfile::tempdir().unwrap();
        let target = JsonConfigTarget::new(
            "Desktop",
            "desktop",
            temp.path().join("desktop.json"),
            temp.path().to_path_buf(),
            HttpStyle::McpRemote,
        );

        assert!(!target.supports_scope(Scope::Project));
        assert_eq!(target.config_path(Scope::Project), temp.path().join("desktop.json"));
    }
}

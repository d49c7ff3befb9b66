//! Turn a catalog entry into a concrete server definition for a target

use serde::Serialize;
use std::collections::BTreeMap;

use super::entry::{CuratedTransport, Entry, EntryKind, KeyValueInput, Package, Remote};
use crate::{Result, WizardError};

/// How a target should launch or reach a server
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ServerConfig {
    Stdio {
        command: String,
        args: Vec<String>,
        env: BTreeMap<String, String>,
    },
    Http {
        url: String,
        /// Wire transport as published ("http", "streamable-http", "sse")
        transport: String,
        headers: BTreeMap<String, String>,
    },
}

/// A named server definition ready to be written into a config store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerSpec {
    pub name: String,
    pub config: ServerConfig,
}

/// Key used for a service inside target config files
///
/// Registry names are reverse-DNS namespaced (`io.github.acme/weather`);
/// only the final segment is used so the key stays readable.
pub fn config_key(name: &str) -> String {
    name.rsplit('/').next().unwrap_or(name).to_string()
}

/// Build the server definition for `entry` with resolved environment values
pub fn resolve_server(entry: &Entry, env: &BTreeMap<String, String>) -> Result<ServerSpec> {
    let config = match entry.kind() {
        EntryKind::Curated(service) => match service.transport {
            CuratedTransport::Stdio => {
                if service.command.is_empty() {
                    return Err(WizardError::Config(format!(
                        "curated service '{}' has no command",
                        service.name
                    )));
                }
                ServerConfig::Stdio {
                    command: service.command.clone(),
                    args: service.args.clone(),
                    env: declared_values(service.env.iter().map(|v| v.name.as_str()), env),
                }
            }
            CuratedTransport::Http => ServerConfig::Http {
                url: service.url.clone(),
                transport: "http".to_string(),
                headers: BTreeMap::new(),
            },
        },
        EntryKind::Registry(server) => {
            if let Some(config) = server.packages.iter().find_map(|p| package_config(p, env)) {
                config
            } else if let Some(remote) = server.remotes.first() {
                remote_config(remote, env)
            } else {
                return Err(WizardError::Registry(format!(
                    "'{}' has no installable package or remote",
                    server.name
                )));
            }
        }
    };

    Ok(ServerSpec {
        name: config_key(entry.name()),
        config,
    })
}

fn declared_values<'a>(
    names: impl Iterator<Item = &'a str>,
    env: &BTreeMap<String, String>,
) -> BTreeMap<String, String> {
    names
        .filter_map(|name| env.get(name).map(|value| (name.to_string(), value.clone())))
        .collect()
}

fn input_value(input: &KeyValueInput, env: &BTreeMap<String, String>) -> Option<String> {
    env.get(&input.name)
        .cloned()
        .or_else(|| input.value.clone())
        .or_else(|| input.default.clone())
        .filter(|v| !v.is_empty())
}

fn package_config(package: &Package, env: &BTreeMap<String, String>) -> Option<ServerConfig> {
    let package_env: BTreeMap<String, String> = package
        .environment_variables
        .iter()
        .filter_map(|input| input_value(input, env).map(|v| (input.name.clone(), v)))
        .collect();
    let version = package.version.as_deref().filter(|v| !v.is_empty());

    let (command, args) = match package.registry_type.as_str() {
        "npm" => {
            let spec = match version {
                Some(v) => format!("{}@{}", package.identifier, v),
                None => package.identifier.clone(),
            };
            ("npx".to_string(), vec!["-y".to_string(), spec])
        }
        "pypi" => {
            let spec = match version {
                Some(v) => format!("{}=={}", package.identifier, v),
                None => package.identifier.clone(),
            };
            ("uvx".to_string(), vec![spec])
        }
        "oci" => {
            let image = match version {
                Some(v) if !package.identifier.contains(':') => format!("{}:{}", package.identifier, v),
                _ => package.identifier.clone(),
            };
            let mut args = vec!["run".to_string(), "-i".to_string(), "--rm".to_string()];
            for name in package_env.keys() {
                args.push("-e".to_string());
                args.push(name.clone());
            }
            args.push(image);
            ("docker".to_string(), args)
        }
        _ => {
            let hint = package.runtime_hint.clone().filter(|h| !h.is_empty())?;
            (hint, vec![package.identifier.clone()])
        }
    };

    Some(ServerConfig::Stdio {
        command,
        args,
        env: package_env,
    })
}

fn remote_config(remote: &Remote, env: &BTreeMap<String, String>) -> ServerConfig {
    let headers = remote
        .headers
        .iter()
        .filter_map(|h| input_value(h, env).map(|v| (h.name.clone(), v)))
        .collect();
    ServerConfig::Http {
        url: remote.url.clone(),
        transport: remote.kind.clone(),
        headers,
    }
}

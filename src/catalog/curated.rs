//! Built-in curated service list

use serde::{Deserialize, Serialize};

use super::entry::CuratedService;
use crate::Result;

const CURATED_YAML: &str = include_str!("curated.yaml");

/// Top-level shape of a curated service file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CuratedFile {
    #[serde(default)]
    pub services: Vec<CuratedService>,
}

impl CuratedFile {
    /// Parse a curated service list from YAML
    pub fn from_yaml(content: &str) -> Result<Self> {
        Ok(serde_yaml_ng::from_str(content)?)
    }
}

/// The curated services embedded in the binary
pub fn builtin_services() -> Result<Vec<CuratedService>> {
    Ok(CuratedFile::from_yaml(CURATED_YAML)?.services)
}

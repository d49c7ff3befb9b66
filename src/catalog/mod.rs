//! Service catalog - curated and registry MCP server definitions
//!
//! # Overview
//!
//! The catalog is what the service-selection screen browses:
//! - Curated services ship with the binary (`curated.yaml`)
//! - Community servers come from an MCP registry and are cached on disk
//! - Both are merged into one [`Catalog`], curated entries winning on name clashes
//!
//! # Architecture
//!
//! ```text
//! curated.yaml ──┐
//!                ├── Catalog::merge ──► all / by_source / search / find
//! MCP registry ──┘         │
//!                          ▼
//!                   Entry (uniform view)
//!                          │
//!                          ▼
//!                resolve_server ──► ServerSpec written by a Target
//! ```

mod curated;
mod engine;
mod entry;
mod registry;
mod resolve;

pub use curated::{builtin_services, CuratedFile};
pub use engine::Catalog;
pub use entry::{
    merge_env_var, CuratedService, CuratedTransport, Entry, EntryKind, EntrySource, EnvVar,
    KeyValueInput, Package, PackageTransport, RegistryServer, Remote, Repository, SourceChoice,
};
pub use registry::{CachedServers, RegistryClient};
pub use resolve::{config_key, resolve_server, ServerConfig, ServerSpec};

//! mcp-wizard: install and uninstall MCP servers across AI tool configs
//!
//! The catalog layer merges curated and registry server definitions, the
//! target layer writes them into each tool's JSON config, and the terminal
//! wizard (feature `tui`) drives the whole flow through the [`backend::Backend`]
//! trait.

pub mod backend;
pub mod catalog;
pub mod cli;
pub mod config;
pub mod credentials;
pub mod error;
pub mod io;
pub mod targets;

pub use error::{Result, WizardError};

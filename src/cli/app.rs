use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// mcp-wizard: install MCP servers into your AI tools
#[derive(Parser, Debug)]
#[command(name = "mcp-wizard")]
#[command(version)]
#[command(about = "Interactive installer for Model Context Protocol servers")]
#[command(
    long_about = "mcp-wizard walks you through picking an MCP server from a curated list or the MCP registry and writes it into the config of Claude Code, Cursor, Gemini CLI, Windsurf or Claude Desktop."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Settings file (defaults to settings.yaml in the platform config dir)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Only offer curated servers
    #[arg(long, global = true)]
    pub no_registry: bool,

    /// Ignore the cached registry listing
    #[arg(long, global = true)]
    pub refresh_registry: bool,

    /// Log level for the log file (RUST_LOG takes precedence)
    #[arg(long, value_enum, default_value = "warn", global = true)]
    pub log_level: LogLevel,
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Commands {
    /// Start directly with installing a server
    Install,
    /// Start directly with removing a server
    Uninstall,
}

/// Log levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn to_filter_directive(&self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::parse_from(["mcp-wizard"]);

        assert!(cli.command.is_none());
        assert!(cli.config.is_none());
        assert!(!cli.no_registry);
        assert!(!cli.refresh_registry);
        assert_eq!(cli.log_level, LogLevel::Warn);
    }

    #[test]
    fn test_subcommand_with_flags() {
        let cli = Cli::parse_from([
            "mcp-wizard",
            "uninstall",
            "--no-registry",
            "--config",
            "/tmp/settings.yaml",
            "--log-level",
            "debug",
        ]);

        assert_eq!(cli.command, Some(Commands::Uninstall));
        assert!(cli.no_registry);
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/settings.yaml")));
        assert_eq!(cli.log_level.to_filter_directive(), "debug");
    }

    #[test]
    fn test_unknown_log_level_is_rejected() {
        assert!(Cli::try_parse_from(["mcp-wizard", "--log-level", "loud"]).is_err());
    }
}

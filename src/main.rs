//! mcp-wizard binary

use anyhow::{Context, Result};
use clap::Parser;
use std::fs::OpenOptions;
use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing_subscriber::EnvFilter;

use mcp_wizard::{
    backend::DefaultBackend,
    cli::{
        tui::{run_wizard, wizard::{Action, WizardOptions}},
        Cli, Commands, LogLevel,
    },
    config::Settings,
    io::{paths, WizardPaths},
    targets::known_targets,
};

fn main() -> Result<()> {
    let cli = Cli::parse();

    let paths = WizardPaths::new()?;
    paths
        .ensure_directories()
        .context("Failed to create mcp-wizard directories")?;
    initialize_tracing(&paths.log_file(), &cli.log_level)?;

    let settings_path = cli.config.clone().unwrap_or_else(|| paths.settings_file());
    let mut settings = Settings::load(&settings_path)
        .with_context(|| format!("Failed to load settings from {}", settings_path.display()))?;
    if cli.no_registry {
        settings.registry.enabled = false;
    }

    let project_dir = std::env::current_dir().context("Failed to determine current directory")?;
    let targets = known_targets(&paths::home_dir()?, &project_dir, &paths::platform_config_dir()?);
    let backend = DefaultBackend::new(&settings, &paths, targets)?;
    if cli.refresh_registry {
        backend.clear_registry_cache()?;
    }

    let options = WizardOptions {
        registry_enabled: backend.registry_enabled(),
        initial_action: cli.command.map(|command| match command {
            Commands::Install => Action::Install,
            Commands::Uninstall => Action::Uninstall,
        }),
    };
    tracing::info!("Starting wizard (registry enabled: {})", options.registry_enabled);

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("Failed to start async runtime")?;
    let result = runtime.block_on(run_wizard(
        Arc::new(backend),
        options,
        Duration::from_millis(settings.poll_interval_ms),
    ));
    // Don't wait on in-flight registry or target work after the UI exits
    runtime.shutdown_background();

    result.map_err(Into::into)
}

/// Log to a file; the terminal belongs to the TUI
fn initialize_tracing(log_file: &Path, log_level: &LogLevel) -> Result<()> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_file)
        .with_context(|| format!("Failed to open log file {}", log_file.display()))?;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(log_level.to_filter_directive()));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .init();
    Ok(())
}

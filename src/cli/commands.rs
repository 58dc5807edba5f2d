//! CLI command implementations.

use std::path::Path;

use crate::api;
use crate::config::Config;
use crate::observability::logger;
use crate::server;
use crate::table::Catalog;

use super::args::{Cli, Command};
use super::errors::{CliError, CliResult};

/// Dispatch a parsed command line.
pub fn run_command(cli: Cli) -> CliResult<()> {
    match cli.command {
        Command::Init { config } => init(&config),
        Command::Start { config } => start(&config),
        Command::Exec { config, statement } => exec(&config, &statement),
    }
}

/// Write a default configuration file.
pub fn init(config_path: &Path) -> CliResult<()> {
    if config_path.exists() {
        return Err(CliError::already_initialized(format!(
            "{} already exists",
            config_path.display()
        )));
    }

    Config::default()
        .save(config_path)
        .map_err(|e| CliError::io_error(format!("failed to write config: {}", e)))?;

    logger::info(
        "config_written",
        &[("path", &config_path.display().to_string())],
    );
    Ok(())
}

/// Load the config and run the server until the process exits.
pub fn start(config_path: &Path) -> CliResult<()> {
    let config = load_config(config_path)?;

    let runtime = tokio::runtime::Runtime::new()
        .map_err(|e| CliError::boot_failed(format!("failed to start runtime: {}", e)))?;

    runtime
        .block_on(server::run(&config))
        .map_err(|e| CliError::boot_failed(format!("server failed: {}", e)))
}

/// Run one statement against the storage root and print the response.
pub fn exec(config_path: &Path, statement: &str) -> CliResult<()> {
    let config = load_config(config_path)?;
    let catalog = Catalog::from_config(&config);

    let response = api::execute_line(&catalog, statement);
    println!("{}", response.to_json());
    Ok(())
}

fn load_config(config_path: &Path) -> CliResult<Config> {
    Config::load(config_path).map_err(|e| {
        CliError::config_error(format!(
            "failed to load config {}: {}",
            config_path.display(),
            e
        ))
    })
}

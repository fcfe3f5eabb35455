//! Command-line interface

pub mod commands;
pub mod output;
pub mod types;

pub use types::{Cli, Commands};

use anyhow::Result;

use crate::domain::errors::MissingCredentialError;
use crate::domain::ports::ApiKeysError;
use crate::infrastructure::config::{ConfigError, ConfigLoader};
use crate::infrastructure::logging::{LogConfig, LoggerImpl};

/// Load configuration, install logging and dispatch the parsed command.
pub async fn run(cli: Cli) -> Result<()> {
    let config = match &cli.config {
        Some(path) => ConfigLoader::load_from_file(path)?,
        None => ConfigLoader::load()?,
    };
    let _logger = LoggerImpl::init(&LogConfig::from(&config.logging))?;

    match &cli.command {
        Commands::Check(args) => commands::check::execute(args, &config, cli.json),
        Commands::Restrict(args) => commands::restrict::execute(args, &config, cli.json).await,
        Commands::Show(args) => commands::restrict::execute_show(args, &config, cli.json).await,
    }
}

/// Short machine-readable category for an error chain.
pub fn error_kind(err: &anyhow::Error) -> &'static str {
    if err.downcast_ref::<MissingCredentialError>().is_some() {
        "missing_credential"
    } else if err.downcast_ref::<ApiKeysError>().is_some() {
        "api_keys"
    } else if err.downcast_ref::<ConfigError>().is_some() {
        "config"
    } else {
        "error"
    }
}

/// Print the error (human or JSON) to stderr and exit with status 1.
pub fn handle_error(err: anyhow::Error, json_mode: bool) -> ! {
    if json_mode {
        let body = serde_json::json!({
            "error": format!("{err:#}"),
            "kind": error_kind(&err),
        });
        eprintln!(
            "{}",
            serde_json::to_string_pretty(&body).unwrap_or_default()
        );
    } else {
        eprintln!("{} {err:#}", console::style("error:").red().bold());
    }
    std::process::exit(1);
}

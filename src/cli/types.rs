use clap::{Parser, Subcommand};
use std::path::PathBuf;

use super::commands::check::CheckArgs;
use super::commands::restrict::{RestrictArgs, ShowArgs};

/// LLM credential checks and Google Cloud API key referrer restriction
#[derive(Parser, Debug)]
#[command(name = "keyward", version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output in JSON format
    #[arg(short, long, global = true)]
    pub json: bool,

    /// Config file (defaults to .keyward/config.yaml and .keyward/local.yaml)
    #[arg(short, long, global = true, env = "KEYWARD_CONFIG_FILE")]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Check that LLM credentials are set in the environment
    Check(CheckArgs),

    /// Restrict an API key to HTTP referrers
    Restrict(RestrictArgs),

    /// Show an API key's current restrictions
    Show(ShowArgs),
}

//! Implementation of the `keyward restrict` and `keyward show` commands.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::Args;
use serde::Serialize;
use std::fmt;
use std::sync::Arc;

use crate::cli::output::progress::{create_spinner_with_message, ProgressBarExt};
use crate::cli::output::table::format_key;
use crate::cli::output::{output, CommandOutput};
use crate::domain::models::{ApiKey, ApiKeysConfig, Config};
use crate::infrastructure::apikeys::{
    token_provider_from_config, ApiKeysClientConfig, ApiKeysHttpClient,
};
use crate::infrastructure::config::ConfigLoader;
use crate::services::KeyRestrictionService;

/// Identifies the key to act on
#[derive(Args, Clone)]
pub struct KeyTargetArgs {
    /// Google Cloud project id
    #[arg(long)]
    pub project: String,

    /// Key id (assigned at key creation; not the key string)
    #[arg(long)]
    pub key_id: String,

    /// OAuth access token (defaults to `gcloud auth print-access-token`)
    #[arg(long, env = "GOOGLE_OAUTH_ACCESS_TOKEN", hide_env_values = true)]
    pub access_token: Option<String>,
}

impl fmt::Debug for KeyTargetArgs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyTargetArgs")
            .field("project", &self.project)
            .field("key_id", &self.key_id)
            .field(
                "access_token",
                &self.access_token.as_ref().map(|_| "[REDACTED]"),
            )
            .finish()
    }
}

#[derive(Args, Debug)]
pub struct RestrictArgs {
    #[command(flatten)]
    pub target: KeyTargetArgs,

    /// Allowed HTTP referrer pattern; repeat for several (defaults to the configured list)
    #[arg(long = "referrer")]
    pub referrers: Vec<String>,
}

#[derive(Args, Debug)]
pub struct ShowArgs {
    #[command(flatten)]
    pub target: KeyTargetArgs,
}

#[derive(Debug, Serialize)]
pub struct KeyOutput {
    pub name: String,
    pub display_name: Option<String>,
    pub allowed_referrers: Vec<String>,
    pub update_time: Option<DateTime<Utc>>,
    #[serde(skip)]
    key: ApiKey,
}

impl From<ApiKey> for KeyOutput {
    fn from(key: ApiKey) -> Self {
        Self {
            name: key.name.clone(),
            display_name: key.display_name.clone(),
            allowed_referrers: key
                .restrictions
                .as_ref()
                .map(|r| r.allowed_referrers().to_vec())
                .unwrap_or_default(),
            update_time: key.update_time,
            key,
        }
    }
}

impl CommandOutput for KeyOutput {
    fn to_human(&self) -> String {
        format_key(&self.key)
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

/// Apply CLI overrides on top of the loaded API Keys configuration.
fn effective_config(
    config: &Config,
    target: &KeyTargetArgs,
    referrers: &[String],
) -> Result<ApiKeysConfig> {
    let mut effective = config.clone();
    if let Some(token) = &target.access_token {
        effective.api_keys.access_token = Some(token.clone());
    }
    if !referrers.is_empty() {
        effective.api_keys.allowed_referrers = referrers.to_vec();
    }
    ConfigLoader::validate(&effective).context("Invalid command options")?;
    Ok(effective.api_keys)
}

fn build_service(api_keys: &ApiKeysConfig) -> Result<KeyRestrictionService> {
    let client = ApiKeysHttpClient::new(
        ApiKeysClientConfig::from(api_keys),
        token_provider_from_config(api_keys),
    )
    .context("Failed to build API Keys client")?;

    Ok(KeyRestrictionService::from_config(Arc::new(client), api_keys))
}

/// Run `keyward restrict`.
pub async fn execute(args: &RestrictArgs, config: &Config, json_mode: bool) -> Result<()> {
    let api_keys = effective_config(config, &args.target, &args.referrers)?;
    let service = build_service(&api_keys)?;

    let spinner = (!json_mode).then(|| {
        create_spinner_with_message(format!(
            "Restricting {} to {} referrer(s)",
            args.target.key_id,
            service.allowed_referrers().len()
        ))
    });

    let result = service
        .restrict_api_key_http(&args.target.project, &args.target.key_id)
        .await;

    if let Some(spinner) = spinner {
        match &result {
            Ok(key) => spinner.finish_success(format!("Updated {}", key.name)),
            Err(err) => spinner.finish_error(err.to_string()),
        }
    }

    let key = result.context("Failed to restrict API key")?;
    output(&KeyOutput::from(key), json_mode);
    Ok(())
}

/// Run `keyward show`.
pub async fn execute_show(args: &ShowArgs, config: &Config, json_mode: bool) -> Result<()> {
    let api_keys = effective_config(config, &args.target, &[])?;
    let service = build_service(&api_keys)?;

    let key = service
        .get_key(&args.target.project, &args.target.key_id)
        .await
        .context("Failed to read API key")?;

    output(&KeyOutput::from(key), json_mode);
    Ok(())
}

use anyhow::{Context, Result};
use figment::providers::{Env, Format, Serialized, Yaml};
use figment::Figment;
use thiserror::Error;

use crate::domain::models::config::Config;

/// Configuration error types
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid log level: {0}. Must be one of: trace, debug, info, warn, error")]
    InvalidLogLevel(String),

    #[error("Invalid log format: {0}. Must be one of: json, pretty")]
    InvalidLogFormat(String),

    #[error("Invalid log rotation: {0}. Must be one of: daily, hourly, never")]
    InvalidLogRotation(String),

    #[error("API Keys base_url cannot be empty")]
    EmptyBaseUrl,

    #[error("Invalid timeout_secs: {0}. Must be at least 1")]
    InvalidTimeout(u64),

    #[error(
        "Invalid poll interval: poll_initial_interval_ms ({0}) must be positive and at most poll_max_interval_ms ({1})"
    )]
    InvalidPollInterval(u64, u64),

    #[error("allowed_referrers cannot be empty")]
    EmptyReferrers,

    #[error("allowed_referrers[{0}] is blank")]
    BlankReferrer(usize),
}

/// Configuration loader with hierarchical merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration with hierarchical merging
    ///
    /// Precedence (lowest to highest):
    /// 1. Programmatic defaults (Serialized)
    /// 2. .keyward/config.yaml
    /// 3. .keyward/local.yaml (optional local overrides)
    /// 4. Environment variables (KEYWARD_* prefix, `__` separates nested keys)
    pub fn load() -> Result<Config> {
        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Yaml::file(".keyward/config.yaml"))
            .merge(Yaml::file(".keyward/local.yaml"))
            .merge(Env::prefixed("KEYWARD_").split("__"))
            .extract()
            .context("Failed to extract configuration from figment")?;

        Self::validate(&config)?;
        Ok(config)
    }

    /// Load configuration from a specific file, still honouring `KEYWARD_*` overrides
    ///
    /// Unlike the default locations, the named file must exist.
    pub fn load_from_file(path: impl AsRef<std::path::Path>) -> Result<Config> {
        let path = path.as_ref();
        if !path.is_file() {
            anyhow::bail!("Config file not found: {}", path.display());
        }

        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Yaml::file(path))
            .merge(Env::prefixed("KEYWARD_").split("__"))
            .extract()
            .with_context(|| format!("Failed to load config from {}", path.display()))?;

        Self::validate(&config)?;
        Ok(config)
    }

    /// Validate configuration after loading
    pub fn validate(config: &Config) -> Result<(), ConfigError> {
        let valid_log_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_log_levels.contains(&config.logging.level.as_str()) {
            return Err(ConfigError::InvalidLogLevel(config.logging.level.clone()));
        }

        let valid_log_formats = ["json", "pretty"];
        if !valid_log_formats.contains(&config.logging.format.as_str()) {
            return Err(ConfigError::InvalidLogFormat(config.logging.format.clone()));
        }

        let valid_rotations = ["daily", "hourly", "never"];
        if !valid_rotations.contains(&config.logging.rotation.as_str()) {
            return Err(ConfigError::InvalidLogRotation(
                config.logging.rotation.clone(),
            ));
        }

        let api_keys = &config.api_keys;
        if api_keys.base_url.trim().is_empty() {
            return Err(ConfigError::EmptyBaseUrl);
        }

        if api_keys.timeout_secs == 0 {
            return Err(ConfigError::InvalidTimeout(api_keys.timeout_secs));
        }

        if api_keys.poll_initial_interval_ms == 0
            || api_keys.poll_initial_interval_ms > api_keys.poll_max_interval_ms
        {
            return Err(ConfigError::InvalidPollInterval(
                api_keys.poll_initial_interval_ms,
                api_keys.poll_max_interval_ms,
            ));
        }

        if api_keys.allowed_referrers.is_empty() {
            return Err(ConfigError::EmptyReferrers);
        }

        if let Some(index) = api_keys
            .allowed_referrers
            .iter()
            .position(|r| r.trim().is_empty())
        {
            return Err(ConfigError::BlankReferrer(index));
        }

        Ok(())
    }
}

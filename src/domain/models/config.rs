use std::fmt;

use serde::{Deserialize, Serialize};

use super::llm::LlmType;

/// Main configuration structure for keyward
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Config {
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Google Cloud API Keys service configuration
    #[serde(default)]
    pub api_keys: ApiKeysConfig,

    /// LLM endpoint types used by `check`
    #[serde(default)]
    pub llm: LlmConfig,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct LoggingConfig {
    /// Log level: trace, debug, info, warn, error
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log format: json or pretty
    #[serde(default = "default_log_format")]
    pub format: String,

    /// Directory for rolling log files; stderr only when unset
    #[serde(default)]
    pub log_dir: Option<String>,

    /// File rotation: daily, hourly or never
    #[serde(default = "default_rotation")]
    pub rotation: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

fn default_rotation() -> String {
    "daily".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            log_dir: None,
            rotation: default_rotation(),
        }
    }
}

/// API Keys service configuration
#[derive(Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ApiKeysConfig {
    /// Service endpoint (overridable for testing/proxies)
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// OAuth access token; falls back to `gcloud auth print-access-token`
    #[serde(default)]
    pub access_token: Option<String>,

    /// Per-request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// First delay between operation polls
    #[serde(default = "default_poll_initial_interval_ms")]
    pub poll_initial_interval_ms: u64,

    /// Upper bound for the delay between operation polls
    #[serde(default = "default_poll_max_interval_ms")]
    pub poll_max_interval_ms: u64,

    /// Referrer patterns applied by `restrict`
    #[serde(default = "default_allowed_referrers")]
    pub allowed_referrers: Vec<String>,
}

impl fmt::Debug for ApiKeysConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiKeysConfig")
            .field("base_url", &self.base_url)
            .field(
                "access_token",
                &self.access_token.as_ref().map(|_| "[REDACTED]"),
            )
            .field("timeout_secs", &self.timeout_secs)
            .field("poll_initial_interval_ms", &self.poll_initial_interval_ms)
            .field("poll_max_interval_ms", &self.poll_max_interval_ms)
            .field("allowed_referrers", &self.allowed_referrers)
            .finish()
    }
}

fn default_base_url() -> String {
    "https://apikeys.googleapis.com".to_string()
}

const fn default_timeout_secs() -> u64 {
    60
}

const fn default_poll_initial_interval_ms() -> u64 {
    500
}

const fn default_poll_max_interval_ms() -> u64 {
    10_000
}

fn default_allowed_referrers() -> Vec<String> {
    vec!["www.example.com/*".to_string()]
}

impl Default for ApiKeysConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            access_token: None,
            timeout_secs: default_timeout_secs(),
            poll_initial_interval_ms: default_poll_initial_interval_ms(),
            poll_max_interval_ms: default_poll_max_interval_ms(),
            allowed_referrers: default_allowed_referrers(),
        }
    }
}

/// LLM endpoint configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct LlmConfig {
    /// Endpoint type for completions
    #[serde(default = "default_completion_type")]
    pub completion_type: LlmType,

    /// Endpoint type for embeddings
    #[serde(default = "default_embedding_type")]
    pub embedding_type: LlmType,
}

const fn default_completion_type() -> LlmType {
    LlmType::OpenaiChat
}

const fn default_embedding_type() -> LlmType {
    LlmType::OpenaiEmbedding
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            completion_type: default_completion_type(),
            embedding_type: default_embedding_type(),
        }
    }
}

//! Access token sources for the API Keys service.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::debug;

use crate::domain::models::ApiKeysConfig;
use crate::domain::ports::{ApiKeysError, TokenProvider};

/// A token supplied up front (config, flag or environment).
#[derive(Clone)]
pub struct StaticTokenProvider {
    token: String,
}

impl StaticTokenProvider {
    /// Always hand out `token`.
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }
}

impl fmt::Debug for StaticTokenProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StaticTokenProvider")
            .field("token", &"[REDACTED]")
            .finish()
    }
}

#[async_trait]
impl TokenProvider for StaticTokenProvider {
    async fn access_token(&self) -> Result<String, ApiKeysError> {
        Ok(self.token.clone())
    }
}

/// Asks the gcloud CLI for a fresh token on every call.
#[derive(Debug, Clone)]
pub struct GcloudTokenProvider {
    program: String,
}

impl GcloudTokenProvider {
    /// Use `gcloud` from `PATH`.
    pub fn new() -> Self {
        Self::with_program("gcloud")
    }

    /// Use a specific executable; it is invoked as `<program> auth print-access-token`.
    pub fn with_program(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl Default for GcloudTokenProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TokenProvider for GcloudTokenProvider {
    async fn access_token(&self) -> Result<String, ApiKeysError> {
        debug!(program = %self.program, "requesting access token");

        let output = Command::new(&self.program)
            .args(["auth", "print-access-token"])
            .output()
            .await
            .map_err(|e| ApiKeysError::Auth(format!("failed to run {}: {e}", self.program)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(ApiKeysError::Auth(format!(
                "{} exited with {}: {}",
                self.program,
                output.status,
                stderr.trim()
            )));
        }

        let token = String::from_utf8_lossy(&output.stdout).trim().to_string();
        if token.is_empty() {
            return Err(ApiKeysError::Auth(format!(
                "{} printed an empty token",
                self.program
            )));
        }
        Ok(token)
    }
}

/// Configured token when present, gcloud otherwise.
pub fn token_provider_from_config(config: &ApiKeysConfig) -> Arc<dyn TokenProvider> {
    match config.access_token.as_deref().map(str::trim) {
        Some(token) if !token.is_empty() => Arc::new(StaticTokenProvider::new(token)),
        _ => Arc::new(GcloudTokenProvider::new()),
    }
}

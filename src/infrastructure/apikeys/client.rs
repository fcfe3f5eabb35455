use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client as ReqwestClient, Response};
use serde::de::DeserializeOwned;
use tracing::{debug, instrument, warn};

use crate::domain::models::{ApiKey, ApiKeysConfig, KeyName, Operation, UpdateKeyRequest};
use crate::domain::ports::{ApiKeysClient, ApiKeysError, TokenProvider};

/// Configuration for the API Keys HTTP client
#[derive(Debug, Clone)]
pub struct ApiKeysClientConfig {
    /// Base URL for the API Keys service
    pub base_url: String,

    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for ApiKeysClientConfig {
    fn default() -> Self {
        Self {
            base_url: "https://apikeys.googleapis.com".to_string(),
            timeout_secs: 60,
        }
    }
}

impl From<&ApiKeysConfig> for ApiKeysClientConfig {
    fn from(config: &ApiKeysConfig) -> Self {
        Self {
            base_url: config.base_url.clone(),
            timeout_secs: config.timeout_secs,
        }
    }
}

/// REST client for `apikeys.googleapis.com/v2`
///
/// Every call is a single attempt. Remote errors are classified into
/// [`ApiKeysError`] and returned to the caller.
pub struct ApiKeysHttpClient {
    /// Reusable HTTP client with connection pooling
    http_client: ReqwestClient,

    base_url: String,

    token_provider: Arc<dyn TokenProvider>,
}

impl ApiKeysHttpClient {
    /// Build a client that authenticates with tokens from `token_provider`.
    pub fn new(
        config: ApiKeysClientConfig,
        token_provider: Arc<dyn TokenProvider>,
    ) -> Result<Self, ApiKeysError> {
        let http_client = ReqwestClient::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .pool_max_idle_per_host(10)
            .build()?;

        Ok(Self {
            http_client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            token_provider,
        })
    }

    fn resource_url(&self, resource: &str) -> String {
        format!("{}/v2/{}", self.base_url, resource)
    }

    async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ApiKeysError> {
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            warn!(status = status.as_u16(), "API Keys request failed");
            return Err(ApiKeysError::from_response(status.as_u16(), &body));
        }

        Ok(serde_json::from_str(&body)?)
    }
}

#[async_trait]
impl ApiKeysClient for ApiKeysHttpClient {
    #[instrument(skip(self, request), fields(key = %request.key.name, update_mask = %request.update_mask))]
    async fn update_key(&self, request: UpdateKeyRequest) -> Result<Operation, ApiKeysError> {
        let token = self.token_provider.access_token().await?;

        let response = self
            .http_client
            .patch(self.resource_url(&request.key.name))
            .bearer_auth(token)
            .query(&[("updateMask", request.update_mask.as_str())])
            .json(&request.key)
            .send()
            .await?;

        let operation: Operation = Self::decode(response).await?;
        debug!(operation = %operation.name, done = operation.done, "update started");
        Ok(operation)
    }

    #[instrument(skip(self))]
    async fn get_operation(&self, name: &str) -> Result<Operation, ApiKeysError> {
        let token = self.token_provider.access_token().await?;

        let response = self
            .http_client
            .get(self.resource_url(name))
            .bearer_auth(token)
            .send()
            .await?;

        Self::decode(response).await
    }

    #[instrument(skip(self), fields(key = %name))]
    async fn get_key(&self, name: &KeyName) -> Result<ApiKey, ApiKeysError> {
        let token = self.token_provider.access_token().await?;

        let response = self
            .http_client
            .get(self.resource_url(name.as_str()))
            .bearer_auth(token)
            .send()
            .await?;

        Self::decode(response).await
    }
}

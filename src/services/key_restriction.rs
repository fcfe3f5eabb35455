//! Restricting API keys to HTTP referrers.

use std::sync::Arc;

use tracing::{info, instrument};

use crate::domain::models::{
    ApiKey, ApiKeysConfig, KeyName, Restrictions, UpdateKeyRequest, RESTRICTIONS_UPDATE_MASK,
};
use crate::domain::ports::{ApiKeysClient, ApiKeysError};
use crate::infrastructure::apikeys::OperationPoller;

/// Applies a referrer allow-list to API keys.
pub struct KeyRestrictionService {
    client: Arc<dyn ApiKeysClient>,
    poller: OperationPoller,
    allowed_referrers: Vec<String>,
}

impl KeyRestrictionService {
    /// Service that applies `allowed_referrers` through `client`.
    pub fn new(
        client: Arc<dyn ApiKeysClient>,
        poller: OperationPoller,
        allowed_referrers: Vec<String>,
    ) -> Self {
        Self {
            client,
            poller,
            allowed_referrers,
        }
    }

    /// Service using the configured referrers and poll intervals.
    pub fn from_config(client: Arc<dyn ApiKeysClient>, config: &ApiKeysConfig) -> Self {
        Self::new(
            client,
            OperationPoller::from(config),
            config.allowed_referrers.clone(),
        )
    }

    /// Referrer patterns this service applies.
    pub fn allowed_referrers(&self) -> &[String] {
        &self.allowed_referrers
    }

    /// The update request for `key_id`: browser restrictions only, masked to
    /// `restrictions`.
    pub fn build_request(&self, project_id: &str, key_id: &str) -> UpdateKeyRequest {
        let key = ApiKey {
            name: KeyName::new(project_id, key_id).to_string(),
            restrictions: Some(Restrictions::browser(self.allowed_referrers.clone())),
            ..Default::default()
        };

        UpdateKeyRequest {
            key,
            update_mask: RESTRICTIONS_UPDATE_MASK.to_string(),
        }
    }

    /// Restrict a key to the configured HTTP referrers and return the updated key.
    ///
    /// Waits for the update operation to complete. Errors from the service are
    /// returned unchanged; nothing is retried.
    #[instrument(skip(self), fields(referrers = self.allowed_referrers.len()))]
    pub async fn restrict_api_key_http(
        &self,
        project_id: &str,
        key_id: &str,
    ) -> Result<ApiKey, ApiKeysError> {
        let request = self.build_request(project_id, key_id);

        let operation = self.client.update_key(request).await?;
        let key = self
            .poller
            .wait_for_key(self.client.as_ref(), operation)
            .await?;

        info!("Successfully updated the API key: {}", key.name);
        Ok(key)
    }

    /// Read a key's current metadata and restrictions.
    #[instrument(skip(self))]
    pub async fn get_key(&self, project_id: &str, key_id: &str) -> Result<ApiKey, ApiKeysError> {
        self.client.get_key(&KeyName::new(project_id, key_id)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::{Operation, OperationStatus};
    use async_trait::async_trait;
    use std::sync::Mutex;
    use std::time::Duration;

    const KEY_ID: &str = "123456789012345-abcdefghijklmnopqrstuv12345";

    /// Records update requests and answers with a completed operation.
    #[derive(Default)]
    struct RecordingClient {
        requests: Mutex<Vec<UpdateKeyRequest>>,
        fail_with_not_found: bool,
        operation_error: Option<OperationStatus>,
    }

    #[async_trait]
    impl ApiKeysClient for RecordingClient {
        async fn update_key(&self, request: UpdateKeyRequest) -> Result<Operation, ApiKeysError> {
            self.requests.lock().unwrap().push(request.clone());
            if self.fail_with_not_found {
                return Err(ApiKeysError::NotFound(format!(
                    "Key {} not found",
                    request.key.name
                )));
            }
            Ok(Operation {
                name: "operations/akmf.p7-1".to_string(),
                done: true,
                response: if self.operation_error.is_some() {
                    None
                } else {
                    Some(serde_json::to_value(&request.key).unwrap())
                },
                error: self.operation_error.clone(),
            })
        }

        async fn get_operation(&self, name: &str) -> Result<Operation, ApiKeysError> {
            Err(ApiKeysError::NotFound(name.to_string()))
        }

        async fn get_key(&self, name: &KeyName) -> Result<ApiKey, ApiKeysError> {
            Ok(ApiKey {
                name: name.to_string(),
                ..Default::default()
            })
        }
    }

    fn service(client: Arc<RecordingClient>, referrers: &[&str]) -> KeyRestrictionService {
        KeyRestrictionService::new(
            client,
            OperationPoller::new(Duration::from_millis(1), Duration::from_millis(2)),
            referrers.iter().map(|r| (*r).to_string()).collect(),
        )
    }

    #[test]
    fn test_build_request_shape() {
        let svc = service(Arc::new(RecordingClient::default()), &["www.example.com/*"]);
        let request = svc.build_request("my-project", KEY_ID);

        assert_eq!(
            request.key.name,
            format!("projects/my-project/locations/global/keys/{KEY_ID}")
        );
        assert_eq!(request.update_mask, "restrictions");
        assert_eq!(
            request.key.restrictions.as_ref().unwrap().allowed_referrers(),
            ["www.example.com/*".to_string()]
        );
    }

    #[test]
    fn test_build_request_keeps_referrers_exactly() {
        let referrers = ["www.example.com/*", "*.example.org/app/*"];
        let svc = service(Arc::new(RecordingClient::default()), &referrers);
        let request = svc.build_request("p", "k");
        let restrictions = request.key.restrictions.unwrap();

        assert_eq!(restrictions.allowed_referrers(), referrers.map(String::from));
        assert!(restrictions.server_key_restrictions.is_none());
        assert!(restrictions.api_targets.is_empty());
    }

    #[tokio::test]
    async fn test_restrict_returns_updated_key() {
        let client = Arc::new(RecordingClient::default());
        let svc = service(Arc::clone(&client), &["www.example.com/*"]);

        let key = svc.restrict_api_key_http("my-project", KEY_ID).await.unwrap();

        assert_eq!(
            key.name,
            format!("projects/my-project/locations/global/keys/{KEY_ID}")
        );
        let requests = client.requests.lock().unwrap();
        assert_eq!(requests.len(), 1, "exactly one update, no retries");
        assert_eq!(requests[0].update_mask, "restrictions");
    }

    #[tokio::test]
    async fn test_restrict_propagates_remote_error() {
        let client = Arc::new(RecordingClient {
            fail_with_not_found: true,
            ..Default::default()
        });
        let svc = service(Arc::clone(&client), &["www.example.com/*"]);

        let err = svc.restrict_api_key_http("p", "missing").await.unwrap_err();

        assert!(matches!(err, ApiKeysError::NotFound(_)));
        assert_eq!(client.requests.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_restrict_surfaces_operation_error() {
        let client = Arc::new(RecordingClient {
            operation_error: Some(OperationStatus {
                code: 3,
                message: "invalid referrer".to_string(),
            }),
            ..Default::default()
        });
        let svc = service(client, &["bad pattern"]);

        let err = svc.restrict_api_key_http("p", "k").await.unwrap_err();
        assert!(matches!(err, ApiKeysError::Operation { code: 3, .. }));
    }

    #[tokio::test]
    async fn test_get_key_uses_full_name() {
        let svc = service(Arc::new(RecordingClient::default()), &["www.example.com/*"]);
        let key = svc.get_key("p", "k").await.unwrap();
        assert_eq!(key.name, "projects/p/locations/global/keys/k");
    }
}

use std::time::Duration;

use backoff::backoff::Backoff;
use backoff::{ExponentialBackoff, ExponentialBackoffBuilder};
use tokio::time::sleep;
use tracing::debug;

use crate::domain::models::{ApiKey, ApiKeysConfig, Operation};
use crate::domain::ports::{ApiKeysClient, ApiKeysError};

/// Waits for a long-running operation to finish.
///
/// Delays between polls grow exponentially up to `max_interval`. There is no
/// overall deadline; each poll is bounded only by the transport timeout.
#[derive(Debug, Clone)]
pub struct OperationPoller {
    initial_interval: Duration,
    max_interval: Duration,
}

impl OperationPoller {
    /// Poller whose delays start at `initial_interval` and never exceed `max_interval`.
    pub const fn new(initial_interval: Duration, max_interval: Duration) -> Self {
        Self {
            initial_interval,
            max_interval,
        }
    }

    /// Delay schedule between polls. Unjittered, so `max_interval` is a hard cap.
    fn backoff(&self) -> ExponentialBackoff {
        ExponentialBackoffBuilder::new()
            .with_initial_interval(self.initial_interval)
            .with_max_interval(self.max_interval)
            .with_randomization_factor(0.0)
            .with_max_elapsed_time(None)
            .build()
    }

    fn next_delay(&self, backoff: &mut ExponentialBackoff) -> Duration {
        backoff
            .next_backoff()
            .map_or(self.max_interval, |delay| delay.min(self.max_interval))
    }

    /// Poll until `operation` is done.
    ///
    /// A done operation carrying an error status is returned as
    /// [`ApiKeysError::Operation`].
    pub async fn wait(
        &self,
        client: &dyn ApiKeysClient,
        mut operation: Operation,
    ) -> Result<Operation, ApiKeysError> {
        let mut backoff = self.backoff();

        while !operation.done {
            if operation.name.is_empty() {
                return Err(ApiKeysError::Unknown(
                    200,
                    "pending operation has no name to poll".to_string(),
                ));
            }

            let delay = self.next_delay(&mut backoff);
            debug!(
                operation = %operation.name,
                delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                "operation pending"
            );
            sleep(delay).await;

            operation = client.get_operation(&operation.name).await?;
        }

        if let Some(status) = operation.error {
            return Err(ApiKeysError::Operation {
                name: operation.name,
                code: status.code,
                message: status.message,
            });
        }

        Ok(operation)
    }

    /// Poll until done and decode the operation's response as a key.
    pub async fn wait_for_key(
        &self,
        client: &dyn ApiKeysClient,
        operation: Operation,
    ) -> Result<ApiKey, ApiKeysError> {
        let done = self.wait(client, operation).await?;
        let response = done.response.ok_or_else(|| {
            ApiKeysError::Unknown(
                200,
                format!("operation {} completed without a response", done.name),
            )
        })?;
        Ok(serde_json::from_value(response)?)
    }
}

impl From<&ApiKeysConfig> for OperationPoller {
    fn from(config: &ApiKeysConfig) -> Self {
        Self::new(
            Duration::from_millis(config.poll_initial_interval_ms),
            Duration::from_millis(config.poll_max_interval_ms),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::{KeyName, OperationStatus, UpdateKeyRequest};
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Replays a fixed sequence of operation states.
    struct ScriptedClient {
        polls: Mutex<Vec<Operation>>,
        polled: Mutex<Vec<String>>,
    }

    impl ScriptedClient {
        fn new(mut polls: Vec<Operation>) -> Self {
            polls.reverse();
            Self {
                polls: Mutex::new(polls),
                polled: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl ApiKeysClient for ScriptedClient {
        async fn update_key(&self, _request: UpdateKeyRequest) -> Result<Operation, ApiKeysError> {
            unreachable!("poller never updates")
        }

        async fn get_operation(&self, name: &str) -> Result<Operation, ApiKeysError> {
            self.polled.lock().unwrap().push(name.to_string());
            self.polls
                .lock()
                .unwrap()
                .pop()
                .ok_or_else(|| ApiKeysError::NotFound(name.to_string()))
        }

        async fn get_key(&self, _name: &KeyName) -> Result<ApiKey, ApiKeysError> {
            unreachable!("poller never reads keys")
        }
    }

    fn fast_poller() -> OperationPoller {
        OperationPoller::new(Duration::from_millis(1), Duration::from_millis(5))
    }

    fn pending(name: &str) -> Operation {
        Operation {
            name: name.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_delays_grow_and_stay_within_max() {
        let poller = OperationPoller::new(Duration::from_millis(500), Duration::from_secs(10));
        let mut backoff = poller.backoff();

        let delays: Vec<Duration> = (0..200).map(|_| poller.next_delay(&mut backoff)).collect();

        assert!(delays[0] >= Duration::from_millis(500));
        assert!(delays[0] < Duration::from_millis(501));
        assert!(delays.windows(2).all(|w| w[0] <= w[1]));
        assert!(delays.iter().all(|d| *d <= Duration::from_secs(10)));
        assert_eq!(delays[199], Duration::from_secs(10));
    }

    #[tokio::test]
    async fn test_done_operation_is_not_polled() {
        let client = ScriptedClient::new(vec![]);
        let op = Operation {
            name: "operations/a".to_string(),
            done: true,
            response: Some(serde_json::json!({"name": "projects/p/locations/global/keys/k"})),
            error: None,
        };

        let key = fast_poller().wait_for_key(&client, op).await.unwrap();
        assert_eq!(key.name, "projects/p/locations/global/keys/k");
        assert!(client.polled.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_polls_until_done() {
        let client = ScriptedClient::new(vec![
            pending("operations/a"),
            Operation {
                name: "operations/a".to_string(),
                done: true,
                response: Some(serde_json::json!({"name": "projects/p/locations/global/keys/k"})),
                error: None,
            },
        ]);

        let key = fast_poller()
            .wait_for_key(&client, pending("operations/a"))
            .await
            .unwrap();
        assert_eq!(key.name, "projects/p/locations/global/keys/k");
        assert_eq!(client.polled.lock().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_operation_error_surfaces() {
        let client = ScriptedClient::new(vec![Operation {
            name: "operations/a".to_string(),
            done: true,
            response: None,
            error: Some(OperationStatus {
                code: 7,
                message: "Permission denied on key".to_string(),
            }),
        }]);

        let err = fast_poller()
            .wait(&client, pending("operations/a"))
            .await
            .unwrap_err();
        match err {
            ApiKeysError::Operation { name, code, message } => {
                assert_eq!(name, "operations/a");
                assert_eq!(code, 7);
                assert_eq!(message, "Permission denied on key");
            }
            other => panic!("Expected Operation error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_poll_error_propagates() {
        let client = ScriptedClient::new(vec![]);
        let err = fast_poller()
            .wait(&client, pending("operations/gone"))
            .await
            .unwrap_err();
        assert!(matches!(err, ApiKeysError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_pending_without_name_fails() {
        let client = ScriptedClient::new(vec![]);
        let err = fast_poller().wait(&client, pending("")).await.unwrap_err();
        assert!(matches!(err, ApiKeysError::Unknown(_, _)));
    }

    #[tokio::test]
    async fn test_done_without_response_fails() {
        let client = ScriptedClient::new(vec![]);
        let op = Operation {
            name: "operations/a".to_string(),
            done: true,
            ..Default::default()
        };
        let err = fast_poller().wait_for_key(&client, op).await.unwrap_err();
        assert!(err.to_string().contains("without a response"));
    }
}

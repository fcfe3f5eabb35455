use async_trait::async_trait;
use serde::Deserialize;

use super::models::{ApiKey, KeyName, Operation, UpdateKeyRequest};

/// Error type for API Keys service calls
///
/// Variants mirror the `google.rpc.Code` families the service reports. The
/// remote message is kept as-is.
#[derive(Debug, thiserror::Error)]
pub enum ApiKeysError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Unauthenticated: {0}")]
    Unauthenticated(String),

    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Aborted: {0}")]
    Aborted(String),

    #[error("Resource exhausted: {0}")]
    ResourceExhausted(String),

    #[error("Service unavailable (HTTP {0}): {1}")]
    Unavailable(u16, String),

    #[error("Operation {name} failed with code {code}: {message}")]
    Operation {
        name: String,
        code: i32,
        message: String,
    },

    #[error("Failed to obtain access token: {0}")]
    Auth(String),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Unknown error (HTTP {0}): {1}")]
    Unknown(u16, String),
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: String,
    #[serde(default)]
    status: String,
}

impl ApiKeysError {
    /// Classify an HTTP error response.
    ///
    /// Google APIs wrap errors as `{"error": {"code", "message", "status"}}`.
    /// The RPC `status` wins over the HTTP code when present; a body that is not
    /// an envelope is used verbatim as the message.
    pub fn from_response(http_status: u16, body: &str) -> Self {
        let (rpc_status, message) = match serde_json::from_str::<ErrorEnvelope>(body) {
            Ok(envelope) => (envelope.error.status, envelope.error.message),
            Err(_) => (String::new(), body.to_string()),
        };

        match rpc_status.as_str() {
            "INVALID_ARGUMENT" | "FAILED_PRECONDITION" | "OUT_OF_RANGE" => {
                Self::InvalidArgument(message)
            }
            "UNAUTHENTICATED" => Self::Unauthenticated(message),
            "PERMISSION_DENIED" => Self::PermissionDenied(message),
            "NOT_FOUND" => Self::NotFound(message),
            "ABORTED" | "ALREADY_EXISTS" => Self::Aborted(message),
            "RESOURCE_EXHAUSTED" => Self::ResourceExhausted(message),
            "UNAVAILABLE" | "INTERNAL" | "DEADLINE_EXCEEDED" => {
                Self::Unavailable(http_status, message)
            }
            _ => match http_status {
                400 => Self::InvalidArgument(message),
                401 => Self::Unauthenticated(message),
                403 => Self::PermissionDenied(message),
                404 => Self::NotFound(message),
                409 => Self::Aborted(message),
                429 => Self::ResourceExhausted(message),
                500..=599 => Self::Unavailable(http_status, message),
                _ => Self::Unknown(http_status, message),
            },
        }
    }
}

/// Port to the Google Cloud API Keys service (v2)
#[async_trait]
pub trait ApiKeysClient: Send + Sync {
    /// Start an update of the fields named in `request.update_mask`.
    ///
    /// Returns the long-running operation handle; it may already be `done`.
    async fn update_key(&self, request: UpdateKeyRequest) -> Result<Operation, ApiKeysError>;

    /// Fetch the current state of a long-running operation.
    async fn get_operation(&self, name: &str) -> Result<Operation, ApiKeysError>;

    /// Read a key's metadata.
    async fn get_key(&self, name: &KeyName) -> Result<ApiKey, ApiKeysError>;
}

/// Source of OAuth access tokens for the API Keys service
#[async_trait]
pub trait TokenProvider: Send + Sync {
    /// A bearer token valid for the next request.
    async fn access_token(&self) -> Result<String, ApiKeysError>;
}

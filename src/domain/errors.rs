//! Missing-credential errors for LLM endpoint configuration.
//!
//! Each variant names the environment variables that should have supplied the
//! missing value. The message is computed once, at construction.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Which family of LLM API a credential belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApiType {
    /// Chat / completion API
    Completion,
    /// Embedding API
    Embedding,
}

impl ApiType {
    /// Map the "is this for embeddings" flag onto an API type.
    pub const fn from_embedding(embedding: bool) -> Self {
        if embedding {
            Self::Embedding
        } else {
            Self::Completion
        }
    }

    /// True for [`ApiType::Embedding`].
    pub const fn is_embedding(self) -> bool {
        matches!(self, Self::Embedding)
    }
}

impl fmt::Display for ApiType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Completion => write!(f, "Completion"),
            Self::Embedding => write!(f, "Embedding"),
        }
    }
}

/// A configuration value an LLM endpoint needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CredentialField {
    /// Secret used to authenticate against the endpoint
    ApiKey,
    /// Base URL of the endpoint
    ApiBase,
    /// Provider-specific name of a deployed model instance
    DeploymentName,
}

impl CredentialField {
    /// Every field, in the order they are checked.
    pub const ALL: [Self; 3] = [Self::ApiKey, Self::ApiBase, Self::DeploymentName];

    /// Human-readable name used at the start of the error message.
    pub const fn label(self) -> &'static str {
        match self {
            Self::ApiKey => "API Key",
            Self::ApiBase => "API Base",
            Self::DeploymentName => "Deployment Name",
        }
    }

    /// Variables shared by completion and embedding configuration.
    pub const fn generic_env_vars(self) -> [&'static str; 2] {
        match self {
            Self::ApiKey => ["OPENAI_API_KEY", "GRAPHRAG_API_KEY"],
            Self::ApiBase => ["OPENAI_API_BASE", "GRAPHRAG_API_BASE"],
            Self::DeploymentName => ["OPENAI_DEPLOYMENT_NAME", "GRAPHRAG_LLM_DEPLOYMENT_NAME"],
        }
    }

    /// Variable dedicated to one API type.
    pub const fn specific_env_var(self, api_type: ApiType) -> &'static str {
        match (self, api_type) {
            (Self::ApiKey, ApiType::Completion) => "GRAPHRAG_LLM_API_KEY",
            (Self::ApiKey, ApiType::Embedding) => "GRAPHRAG_EMBEDDING_API_KEY",
            (Self::ApiBase, ApiType::Completion) => "GRAPHRAG_API_BASE",
            (Self::ApiBase, ApiType::Embedding) => "GRAPHRAG_EMBEDDING_API_BASE",
            (Self::DeploymentName, ApiType::Completion) => "GRAPHRAG_LLM_DEPLOYMENT_NAME",
            (Self::DeploymentName, ApiType::Embedding) => "GRAPHRAG_EMBEDDING_DEPLOYMENT_NAME",
        }
    }

    /// Variables consulted for this field, highest precedence first.
    ///
    /// The specific variable wins, then the generics with the `GRAPHRAG_*`
    /// name ahead of the `OPENAI_*` one. A name listed twice is only returned once.
    pub fn lookup_order(self, api_type: ApiType) -> Vec<&'static str> {
        let [openai, graphrag] = self.generic_env_vars();
        let mut order = Vec::with_capacity(3);
        for name in [self.specific_env_var(api_type), graphrag, openai] {
            if !order.contains(&name) {
                order.push(name);
            }
        }
        order
    }
}

impl fmt::Display for CredentialField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

fn format_missing_message(field: CredentialField, api_type: ApiType) -> String {
    let [first, second] = field.generic_env_vars();
    format!(
        "{} is required for {} API. Please set either the {}, {} or {} environment variable.",
        field.label(),
        api_type,
        first,
        second,
        field.specific_env_var(api_type)
    )
}

/// A credential required by an LLM endpoint was not configured.
///
/// One variant per field so callers can match on the kind of value that is
/// missing without parsing the message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MissingCredentialError {
    /// No API key was found
    #[error("{message}")]
    ApiKeyMissing { embedding: bool, message: String },

    /// No API base URL was found
    #[error("{message}")]
    ApiBaseMissing { embedding: bool, message: String },

    /// No deployment name was found
    #[error("{message}")]
    DeploymentNameMissing { embedding: bool, message: String },
}

impl MissingCredentialError {
    /// Build the error for `field` on the given API type.
    pub fn new(field: CredentialField, api_type: ApiType) -> Self {
        let embedding = api_type.is_embedding();
        let message = format_missing_message(field, api_type);
        match field {
            CredentialField::ApiKey => Self::ApiKeyMissing { embedding, message },
            CredentialField::ApiBase => Self::ApiBaseMissing { embedding, message },
            CredentialField::DeploymentName => Self::DeploymentNameMissing { embedding, message },
        }
    }

    /// API key missing for the completion (`false`) or embedding (`true`) API.
    pub fn api_key(embedding: bool) -> Self {
        Self::new(CredentialField::ApiKey, ApiType::from_embedding(embedding))
    }

    /// API base URL missing.
    pub fn api_base(embedding: bool) -> Self {
        Self::new(CredentialField::ApiBase, ApiType::from_embedding(embedding))
    }

    /// Deployment name missing.
    pub fn deployment_name(embedding: bool) -> Self {
        Self::new(
            CredentialField::DeploymentName,
            ApiType::from_embedding(embedding),
        )
    }

    /// The field that was missing.
    pub const fn field(&self) -> CredentialField {
        match self {
            Self::ApiKeyMissing { .. } => CredentialField::ApiKey,
            Self::ApiBaseMissing { .. } => CredentialField::ApiBase,
            Self::DeploymentNameMissing { .. } => CredentialField::DeploymentName,
        }
    }

    /// Whether the error concerns the embedding API.
    pub const fn is_embedding(&self) -> bool {
        match self {
            Self::ApiKeyMissing { embedding, .. }
            | Self::ApiBaseMissing { embedding, .. }
            | Self::DeploymentNameMissing { embedding, .. } => *embedding,
        }
    }

    /// The API type the error concerns.
    pub const fn api_type(&self) -> ApiType {
        ApiType::from_embedding(self.is_embedding())
    }

    /// The formatted message.
    pub fn message(&self) -> &str {
        match self {
            Self::ApiKeyMissing { message, .. }
            | Self::ApiBaseMissing { message, .. }
            | Self::DeploymentNameMissing { message, .. } => message,
        }
    }
}

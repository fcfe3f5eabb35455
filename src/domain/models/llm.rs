use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::errors::{ApiType, CredentialField};

/// LLM endpoint flavours and the credentials each one needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LlmType {
    /// OpenAI chat completions
    OpenaiChat,
    /// Azure OpenAI chat completions
    AzureOpenaiChat,
    /// OpenAI embeddings
    OpenaiEmbedding,
    /// Azure OpenAI embeddings
    AzureOpenaiEmbedding,
}

impl LlmType {
    /// Completion or embedding.
    pub const fn api_type(self) -> ApiType {
        match self {
            Self::OpenaiChat | Self::AzureOpenaiChat => ApiType::Completion,
            Self::OpenaiEmbedding | Self::AzureOpenaiEmbedding => ApiType::Embedding,
        }
    }

    /// Azure endpoints are addressed by base URL and deployment name.
    pub const fn is_azure(self) -> bool {
        matches!(self, Self::AzureOpenaiChat | Self::AzureOpenaiEmbedding)
    }

    /// Fields that must be set, in the order they are checked.
    pub fn required_fields(self) -> &'static [CredentialField] {
        if self.is_azure() {
            &CredentialField::ALL
        } else {
            &[CredentialField::ApiKey]
        }
    }

    /// Snake-case name as used in config files and on the command line.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::OpenaiChat => "openai_chat",
            Self::AzureOpenaiChat => "azure_openai_chat",
            Self::OpenaiEmbedding => "openai_embedding",
            Self::AzureOpenaiEmbedding => "azure_openai_embedding",
        }
    }
}

impl fmt::Display for LlmType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for LlmType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "openai_chat" => Ok(Self::OpenaiChat),
            "azure_openai_chat" => Ok(Self::AzureOpenaiChat),
            "openai_embedding" => Ok(Self::OpenaiEmbedding),
            "azure_openai_embedding" => Ok(Self::AzureOpenaiEmbedding),
            other => Err(format!("Unknown LLM type: {other}")),
        }
    }
}

/// Credentials resolved for one endpoint.
#[derive(Clone, PartialEq, Eq, Serialize)]
pub struct LlmCredentials {
    pub llm_type: LlmType,
    #[serde(skip_serializing)]
    pub api_key: String,
    pub api_base: Option<String>,
    pub deployment_name: Option<String>,
}

impl fmt::Debug for LlmCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LlmCredentials")
            .field("llm_type", &self.llm_type)
            .field("api_key", &"[REDACTED]")
            .field("api_base", &self.api_base)
            .field("deployment_name", &self.deployment_name)
            .finish()
    }
}

pub mod api_key;
pub mod config;
pub mod llm;

pub use api_key::{
    ApiKey, ApiTarget, BrowserKeyRestrictions, KeyName, Operation, OperationStatus, Restrictions,
    ServerKeyRestrictions, UpdateKeyRequest, RESTRICTIONS_UPDATE_MASK,
};
pub use config::{ApiKeysConfig, Config, LlmConfig, LoggingConfig};
pub use llm::{LlmCredentials, LlmType};

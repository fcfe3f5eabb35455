//! keyward - LLM credential checks and API key restriction
//!
//! Two independent tools sharing one ambient stack:
//!
//! - **Missing-credential reporting**: [`MissingCredentialError`] names the
//!   environment variables that should supply an LLM endpoint's API key, base
//!   URL or deployment name; [`CredentialCheck`] resolves them from the
//!   environment.
//! - **API key referrer restriction**: [`KeyRestrictionService`] limits a
//!   Google Cloud API key to HTTP referrer patterns and waits for the update
//!   operation to complete.
//!
//! # Architecture
//!
//! - **Domain Layer** (`domain`): errors, resources and ports
//! - **Service Layer** (`services`): the two operations
//! - **Infrastructure Layer** (`infrastructure`): REST client, config, logging
//! - **CLI Layer** (`cli`): command-line interface
//!
//! # Example
//!
//! ```
//! use keyward::MissingCredentialError;
//!
//! let err = MissingCredentialError::api_key(true);
//! assert!(err.to_string().contains("GRAPHRAG_EMBEDDING_API_KEY"));
//! ```

pub mod cli;
pub mod domain;
pub mod infrastructure;
pub mod services;

pub use domain::errors::{ApiType, CredentialField, MissingCredentialError};
pub use domain::models::{ApiKey, Config, KeyName, LlmType, Restrictions, UpdateKeyRequest};
pub use domain::ports::{ApiKeysClient, ApiKeysError, TokenProvider};
pub use infrastructure::config::{ConfigError, ConfigLoader};
pub use services::{CredentialCheck, KeyRestrictionService};

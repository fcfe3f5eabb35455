//! Domain layer for keyward
//!
//! Error taxonomies, API key resources, configuration models and the ports
//! infrastructure adapters implement.

pub mod errors;
pub mod models;
pub mod ports;

pub use errors::{ApiType, CredentialField, MissingCredentialError};
pub use ports::{ApiKeysClient, ApiKeysError, TokenProvider};

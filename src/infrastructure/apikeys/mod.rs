//! Google Cloud API Keys service adapter
//!
//! - REST client (`reqwest`) implementing the `ApiKeysClient` port
//! - Long-running operation polling
//! - Access token providers

pub mod auth;
pub mod client;
pub mod poller;

pub use auth::{token_provider_from_config, GcloudTokenProvider, StaticTokenProvider};
pub use client::{ApiKeysClientConfig, ApiKeysHttpClient};
pub use poller::OperationPoller;

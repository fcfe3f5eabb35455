//! Infrastructure layer module
//!
//! Adapters and external integrations:
//! - Google Cloud API Keys REST client
//! - Environment credential resolution
//! - Configuration management
//! - Logging infrastructure
//!
//! Infrastructure implementations satisfy the port traits defined in the domain layer.

pub mod apikeys;
pub mod config;
pub mod credentials;
pub mod logging;

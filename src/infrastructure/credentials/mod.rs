//! Credentials management infrastructure
//!
//! Resolves LLM endpoint credentials from environment variables:
//! - precedence across the generic and API-specific variable names
//! - injectable lookup source for tests

pub mod resolver;

pub use resolver::{CredentialResolver, ResolvedValue};

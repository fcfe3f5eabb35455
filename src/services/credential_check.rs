//! Checking that an LLM endpoint has the credentials it needs.

use serde::Serialize;
use tracing::debug;

use crate::domain::errors::{CredentialField, MissingCredentialError};
use crate::domain::models::{LlmCredentials, LlmType};
use crate::infrastructure::credentials::CredentialResolver;

/// Resolution status of one field, for reporting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldStatus {
    pub field: CredentialField,
    pub required: bool,
    /// Variable the value came from, `None` when unset
    pub source: Option<&'static str>,
    /// Names that were consulted, highest precedence first
    pub candidates: Vec<&'static str>,
}

impl FieldStatus {
    /// Required but not found.
    pub const fn is_missing(&self) -> bool {
        self.required && self.source.is_none()
    }
}

/// Validates LLM credentials resolved from the environment.
#[derive(Debug)]
pub struct CredentialCheck {
    resolver: CredentialResolver,
}

impl CredentialCheck {
    /// Check backed by `resolver`.
    pub const fn new(resolver: CredentialResolver) -> Self {
        Self { resolver }
    }

    /// Resolve every field `llm_type` needs.
    ///
    /// Fails with the first missing field, checked as key, base, then
    /// deployment name.
    pub fn validate(&self, llm_type: LlmType) -> Result<LlmCredentials, MissingCredentialError> {
        let api_type = llm_type.api_type();

        for &field in llm_type.required_fields() {
            if self.resolver.resolve(field, api_type).is_none() {
                debug!(%llm_type, %field, "required credential missing");
                return Err(MissingCredentialError::new(field, api_type));
            }
        }

        let value = |field| self.resolver.resolve(field, api_type).map(|r| r.value);

        Ok(LlmCredentials {
            llm_type,
            api_key: value(CredentialField::ApiKey).unwrap_or_default(),
            api_base: value(CredentialField::ApiBase),
            deployment_name: value(CredentialField::DeploymentName),
        })
    }

    /// Status of every field for `llm_type`, required or not.
    pub fn report(&self, llm_type: LlmType) -> Vec<FieldStatus> {
        let api_type = llm_type.api_type();
        let required = llm_type.required_fields();

        CredentialField::ALL
            .iter()
            .map(|&field| FieldStatus {
                field,
                required: required.contains(&field),
                source: self.resolver.resolve(field, api_type).map(|r| r.source),
                candidates: field.lookup_order(api_type),
            })
            .collect()
    }
}

use std::fmt;

use serde::Serialize;

use crate::domain::errors::{ApiType, CredentialField};

/// A value found in the environment and the variable it came from.
#[derive(Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedValue {
    #[serde(skip_serializing)]
    pub value: String,
    pub source: &'static str,
}

impl fmt::Debug for ResolvedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResolvedValue")
            .field("source", &self.source)
            .finish_non_exhaustive()
    }
}

type Lookup = dyn Fn(&str) -> Option<String> + Send + Sync;

/// Looks up credential fields by their environment variable names.
pub struct CredentialResolver {
    lookup: Box<Lookup>,
}

impl CredentialResolver {
    /// Resolve through an arbitrary name -> value lookup.
    pub fn new<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String> + Send + Sync + 'static,
    {
        Self {
            lookup: Box::new(lookup),
        }
    }

    /// Resolve from the process environment.
    pub fn from_env() -> Self {
        Self::new(|name| std::env::var(name).ok())
    }

    /// First non-blank value in the field's lookup order.
    pub fn resolve(&self, field: CredentialField, api_type: ApiType) -> Option<ResolvedValue> {
        field.lookup_order(api_type).into_iter().find_map(|source| {
            (self.lookup)(source)
                .filter(|value| !value.trim().is_empty())
                .map(|value| ResolvedValue { value, source })
        })
    }
}

impl fmt::Debug for CredentialResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialResolver").finish_non_exhaustive()
    }
}

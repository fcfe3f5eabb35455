//! Google Cloud API Keys (v2) resources.
//!
//! Field names follow the REST representation (camelCase on the wire).

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Update mask that limits an update to the key's restrictions.
pub const RESTRICTIONS_UPDATE_MASK: &str = "restrictions";

/// Fully qualified key resource name:
/// `projects/{project}/locations/global/keys/{key_id}`.
///
/// Nothing is validated locally; the service rejects malformed names.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KeyName(String);

impl KeyName {
    /// Build the resource name for a key in the `global` location.
    pub fn new(project_id: &str, key_id: &str) -> Self {
        Self(format!(
            "projects/{project_id}/locations/global/keys/{key_id}"
        ))
    }

    /// The resource name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for KeyName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// HTTP referrers allowed to use a browser key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BrowserKeyRestrictions {
    /// Referrer glob patterns such as `www.example.com/*`
    #[serde(default)]
    pub allowed_referrers: Vec<String>,
}

/// Caller IP addresses allowed to use a server key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerKeyRestrictions {
    /// IPv4/IPv6 addresses or CIDR ranges
    #[serde(default)]
    pub allowed_ips: Vec<String>,
}

/// A Google API service (and optionally methods) the key may call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiTarget {
    /// Service name, e.g. `translate.googleapis.com`
    pub service: String,

    /// Method selectors; empty means every method
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub methods: Vec<String>,
}

/// Restrictions attached to a key. Absent kinds are left out on the wire.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Restrictions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub browser_key_restrictions: Option<BrowserKeyRestrictions>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub server_key_restrictions: Option<ServerKeyRestrictions>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub api_targets: Vec<ApiTarget>,
}

impl Restrictions {
    /// Restrictions limited to the given HTTP referrers.
    pub fn browser(allowed_referrers: Vec<String>) -> Self {
        Self {
            browser_key_restrictions: Some(BrowserKeyRestrictions { allowed_referrers }),
            ..Default::default()
        }
    }

    /// The referrer allow-list, empty when the key has no browser restrictions.
    pub fn allowed_referrers(&self) -> &[String] {
        self.browser_key_restrictions
            .as_ref()
            .map_or(&[], |b| b.allowed_referrers.as_slice())
    }
}

/// An API key resource.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiKey {
    /// Resource name
    #[serde(default)]
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uid: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,

    /// The secret key string. Only returned by the service, never sent.
    #[serde(default, skip_serializing)]
    pub key_string: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub create_time: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub update_time: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub restrictions: Option<Restrictions>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub etag: Option<String>,
}

/// Request to update selected fields of a key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateKeyRequest {
    /// The key carrying its name and the new field values
    pub key: ApiKey,

    /// Comma-separated list of fields to update
    pub update_mask: String,
}

/// Error status reported by a failed long-running operation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperationStatus {
    /// `google.rpc.Code` value
    #[serde(default)]
    pub code: i32,

    #[serde(default)]
    pub message: String,
}

/// A long-running operation handle.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Operation {
    /// Operation resource name, e.g. `operations/akmf.p7-...`
    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub done: bool,

    /// The result once `done`; for key updates this is the updated key
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response: Option<serde_json::Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<OperationStatus>,
}

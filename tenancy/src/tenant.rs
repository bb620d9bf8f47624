//! Tenant identity.

use serde::{Deserialize, Serialize};

/// Unique identifier for a tenant.
///
/// Tenant ids are opaque, case-sensitive strings. The uppercase form is only
/// ever used when deriving environment variable names; store keys and the
/// in-memory map always see the id verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TenantId(String);

impl TenantId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Uppercase form used in `<PREFIX>_TENANT_<ID>_<FIELD>` variable names.
    pub fn env_component(&self) -> String {
        self.0.to_uppercase()
    }
}

impl Default for TenantId {
    fn default() -> Self {
        Self("default".to_string())
    }
}

impl std::fmt::Display for TenantId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for TenantId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for TenantId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

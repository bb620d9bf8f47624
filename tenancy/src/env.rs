//! Environment variable source for tenant configuration.
//!
//! Variables follow the convention `<PREFIX>_TENANT_<TENANT_ID_UPPER>_<FIELD>`,
//! e.g. `POSTGRES_TENANT_ACME_HOST`. The tenant id is uppercased only for the
//! variable name; ids discovered by scanning the environment are reported
//! lowercase.

use std::str::FromStr;

use tracing::warn;

use crate::tenant::TenantId;

/// Read-only view of the process environment, scoped to one adapter prefix.
#[derive(Debug, Clone)]
pub struct EnvSource {
    prefix: &'static str,
}

impl EnvSource {
    pub fn new(prefix: &'static str) -> Self {
        Self { prefix }
    }

    pub fn prefix(&self) -> &'static str {
        self.prefix
    }

    fn var_name(&self, tenant_id: &TenantId, field: &str) -> String {
        format!("{}_TENANT_{}_{}", self.prefix, tenant_id.env_component(), field)
    }

    /// Read one field for a tenant. Empty values count as unset.
    pub fn var(&self, tenant_id: &TenantId, field: &str) -> Option<String> {
        std::env::var(self.var_name(tenant_id, field))
            .ok()
            .filter(|v| !v.is_empty())
    }

    pub fn var_or(&self, tenant_id: &TenantId, field: &str, default: &str) -> String {
        self.var(tenant_id, field)
            .unwrap_or_else(|| default.to_string())
    }

    /// Parse a field, falling back to `default` when unset or malformed.
    pub fn var_parsed<T: FromStr>(&self, tenant_id: &TenantId, field: &str, default: T) -> T {
        match self.var(tenant_id, field) {
            Some(raw) => match raw.parse() {
                Ok(value) => value,
                Err(_) => {
                    warn!(
                        tenant = %tenant_id,
                        var = %self.var_name(tenant_id, field),
                        "unparsable environment value, using default"
                    );
                    default
                }
            },
            None => default,
        }
    }

    pub fn var_bool(&self, tenant_id: &TenantId, field: &str, default: bool) -> bool {
        match self.var(tenant_id, field) {
            Some(raw) => raw.eq_ignore_ascii_case("true"),
            None => default,
        }
    }

    /// Enumerate tenant ids that have the `marker` field configured.
    ///
    /// Ids are lowercased, deduplicated, and returned in sorted order.
    pub fn tenant_ids(&self, marker: &str) -> Vec<TenantId> {
        let lead = format!("{}_TENANT_", self.prefix);
        let tail = format!("_{marker}");
        let mut ids: Vec<TenantId> = std::env::vars()
            .filter_map(|(name, value)| {
                if value.is_empty() {
                    return None;
                }
                let rest = name.strip_prefix(&lead)?;
                let id = rest.strip_suffix(&tail)?;
                if id.is_empty() {
                    return None;
                }
                Some(TenantId::new(id.to_lowercase()))
            })
            .collect();
        ids.sort_by(|a, b| a.as_str().cmp(b.as_str()));
        ids.dedup();
        ids
    }
}

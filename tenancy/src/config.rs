//! Tenant configuration contract shared by all service adapters.

use serde::{de::DeserializeOwned, Serialize};

use crate::{env::EnvSource, error::TenancyResult, tenant::TenantId};

/// Default bound on simultaneous in-flight operations per tenant.
pub const DEFAULT_MAX_CONCURRENT_REQUESTS: usize = 10;

/// Connection parameters and limits for one tenant of one service.
///
/// Implementations are immutable value objects: re-registering a tenant
/// replaces the whole config (and rebuilds the dependent resources) rather
/// than mutating it in place. The serde representation is the persisted
/// record format, a JSON object mirroring the fields exactly.
pub trait TenantConfig: Clone + Send + Sync + Serialize + DeserializeOwned + 'static {
    /// Field suffix whose presence marks a tenant as configured in the
    /// environment (e.g. `HOST`). When it is unset the environment source
    /// yields nothing for that tenant.
    const ENV_MARKER: &'static str;

    fn tenant_id(&self) -> &TenantId;

    /// Derive a config from environment variables, or `None` when the
    /// marker field is absent.
    fn from_env(env: &EnvSource, tenant_id: &TenantId) -> Option<Self>;

    /// Schema validation applied at registration time.
    fn validate(&self) -> TenancyResult<()> {
        Ok(())
    }

    /// Size of the tenant's concurrency gate.
    fn max_concurrent_requests(&self) -> usize {
        DEFAULT_MAX_CONCURRENT_REQUESTS
    }
}

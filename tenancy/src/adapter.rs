//! The adapter seam: each service supplies a config type and a client
//! factory.

use async_trait::async_trait;

use crate::{config::TenantConfig, error::TenancyResult};

/// Client factory for one service integration.
///
/// Construction must be a pure function of the config: no global state is
/// consulted beyond what the config names, and calling `build` twice with
/// the same config yields behaviorally equivalent clients. Construction must
/// not block on the remote service being reachable; credential and
/// connectivity problems surface on first real use.
#[async_trait]
pub trait ServiceAdapter: Send + Sync + 'static {
    /// Short service name; also the store key namespace
    /// (`mcp:<NAME>:tenant:<tenant_id>`).
    const NAME: &'static str;

    /// Environment variable prefix for `<PREFIX>_TENANT_<ID>_<FIELD>`.
    const ENV_PREFIX: &'static str;

    type Config: TenantConfig;
    type Client: Send + Sync + 'static;

    async fn build(&self, config: &Self::Config) -> TenancyResult<Self::Client>;

    /// Release a client's resources. Invoked when an entry is replaced by
    /// re-registration and at shutdown; the default just drops the handle.
    async fn close(&self, client: Self::Client) {
        drop(client);
    }
}

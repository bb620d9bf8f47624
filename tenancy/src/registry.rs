//! Generic tenant registry: lazy resolution, memoized clients, graceful
//! shutdown.
//!
//! One registry instance exists per adapter per process, constructed at
//! startup and handed by reference to every tool handler. Resolution runs
//! through a fixed-priority source chain: the in-memory map, the persistent
//! store, then the process environment. Store failures degrade to "source
//! yields nothing" with a warning; the environment fallback preserves
//! liveness.

use std::{collections::HashMap, sync::Arc};

use config_store::ConfigStore;
use parking_lot::RwLock;
use tokio::sync::{Mutex, OwnedSemaphorePermit, Semaphore};
use tracing::{debug, info, warn};

use crate::{
    adapter::ServiceAdapter,
    config::TenantConfig,
    env::EnvSource,
    error::{TenancyError, TenancyResult},
    tenant::TenantId,
};

/// A fully constructed tenant entry: config, live client, concurrency gate.
///
/// Entries are only ever inserted into the registry once construction has
/// finished, so no caller observes a partially built client.
pub struct RegisteredTenant<A: ServiceAdapter> {
    config: A::Config,
    client: A::Client,
    gate: Arc<Semaphore>,
}

impl<A: ServiceAdapter> RegisteredTenant<A> {
    pub fn config(&self) -> &A::Config {
        &self.config
    }

    pub fn client(&self) -> &A::Client {
        &self.client
    }

    /// Admission control: acquire a permit before issuing an outbound call
    /// and hold it for the call's duration. Dropping the permit releases the
    /// slot, so release happens unconditionally on success or failure.
    pub async fn acquire(&self) -> TenancyResult<OwnedSemaphorePermit> {
        Arc::clone(&self.gate)
            .acquire_owned()
            .await
            .map_err(|_| TenancyError::UpstreamUnavailable("concurrency gate closed".to_string()))
    }

    pub fn available_permits(&self) -> usize {
        self.gate.available_permits()
    }
}

impl<A: ServiceAdapter> std::fmt::Debug for RegisteredTenant<A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegisteredTenant")
            .field("available_permits", &self.available_permits())
            .finish_non_exhaustive()
    }
}

/// Owns the live mapping from tenant id to constructed client state for one
/// service adapter.
pub struct TenantRegistry<A: ServiceAdapter> {
    adapter: A,
    env: EnvSource,
    store: Arc<dyn ConfigStore>,
    tenants: RwLock<HashMap<TenantId, Arc<RegisteredTenant<A>>>>,
    /// Serializes the resolve-and-construct path so concurrent cache misses
    /// for the same tenant build one client, not two.
    resolve: Mutex<()>,
}

impl<A: ServiceAdapter> TenantRegistry<A> {
    pub fn new(adapter: A, store: Arc<dyn ConfigStore>) -> Self {
        Self {
            adapter,
            env: EnvSource::new(A::ENV_PREFIX),
            store,
            tenants: RwLock::new(HashMap::new()),
            resolve: Mutex::new(()),
        }
    }

    fn store_key(tenant_id: &TenantId) -> String {
        format!("mcp:{}:tenant:{}", A::NAME, tenant_id)
    }

    fn store_key_prefix() -> String {
        format!("mcp:{}:tenant:", A::NAME)
    }

    /// Bulk-load persisted tenants, then overlay environment-configured
    /// ones.
    ///
    /// Individual tenant failures are logged and skipped, never fatal to
    /// startup. The environment pass runs last, so environment-derived
    /// configs win when both sources name the same tenant
    /// (last-registration-wins).
    pub async fn initialize(&self) -> TenancyResult<()> {
        match self.store.ping().await {
            Ok(true) => {}
            Ok(false) => debug!(adapter = A::NAME, "config store persistence disabled"),
            Err(e) => warn!(adapter = A::NAME, "config store unreachable: {e}"),
        }

        let prefix = Self::store_key_prefix();
        let keys = match self.store.keys(&format!("{prefix}*")).await {
            Ok(keys) => keys,
            Err(e) => {
                warn!(adapter = A::NAME, "store unavailable during initialize: {e}");
                Vec::new()
            }
        };

        for key in keys {
            let Some(raw_id) = key.strip_prefix(&prefix) else {
                continue;
            };
            let tenant_id = TenantId::new(raw_id);
            let Some(config) = self.load_from_store(&tenant_id).await else {
                continue;
            };
            if let Err(e) = self.register_tenant(config).await {
                warn!(adapter = A::NAME, tenant = %tenant_id, "skipping persisted tenant: {e}");
            }
        }

        for tenant_id in self.env.tenant_ids(A::Config::ENV_MARKER) {
            let Some(config) = A::Config::from_env(&self.env, &tenant_id) else {
                continue;
            };
            if let Err(e) = self.register_tenant(config).await {
                warn!(adapter = A::NAME, tenant = %tenant_id, "skipping environment tenant: {e}");
            }
        }

        info!(
            adapter = A::NAME,
            tenants = self.len(),
            "tenant registry initialized"
        );
        Ok(())
    }

    /// Validate, build resources, swap the entry in, release the replaced
    /// entry, and persist the config.
    ///
    /// Validation or construction failure leaves prior state untouched.
    pub async fn register_tenant(&self, config: A::Config) -> TenancyResult<()> {
        config.validate()?;
        let tenant_id = config.tenant_id().clone();

        let client = self.adapter.build(&config).await?;
        let gate = Arc::new(Semaphore::new(config.max_concurrent_requests()));
        let entry = Arc::new(RegisteredTenant {
            config: config.clone(),
            client,
            gate,
        });

        let previous = self.tenants.write().insert(tenant_id.clone(), entry);
        if let Some(previous) = previous {
            self.release(&tenant_id, previous).await;
        }

        self.persist(&config).await;
        debug!(adapter = A::NAME, tenant = %tenant_id, "tenant registered");
        Ok(())
    }

    /// Return the cached entry, or resolve the tenant through the source
    /// chain and construct one.
    pub async fn get_client(&self, tenant_id: &str) -> TenancyResult<Arc<RegisteredTenant<A>>> {
        let tenant_id = TenantId::new(tenant_id);
        if let Some(entry) = self.tenants.read().get(&tenant_id) {
            return Ok(Arc::clone(entry));
        }

        let _guard = self.resolve.lock().await;
        if let Some(entry) = self.tenants.read().get(&tenant_id) {
            return Ok(Arc::clone(entry));
        }

        let config = match self.load_from_store(&tenant_id).await {
            Some(config) => config,
            None => A::Config::from_env(&self.env, &tenant_id)
                .ok_or_else(|| TenancyError::TenantNotFound(tenant_id.to_string()))?,
        };

        self.register_tenant(config).await?;
        self.tenants
            .read()
            .get(&tenant_id)
            .map(Arc::clone)
            .ok_or_else(|| TenancyError::TenantNotFound(tenant_id.to_string()))
    }

    /// Release every entry's resources and the store connection.
    ///
    /// Best-effort: one tenant's failure never blocks the rest. Afterwards
    /// the registry is inert; a subsequent [`initialize`](Self::initialize)
    /// brings it back the same way a process restart would.
    pub async fn close_all(&self) {
        let drained: Vec<(TenantId, Arc<RegisteredTenant<A>>)> =
            self.tenants.write().drain().collect();
        for (tenant_id, entry) in drained {
            self.release(&tenant_id, entry).await;
        }
        self.store.close().await;
        info!(adapter = A::NAME, "tenant registry closed");
    }

    pub fn contains(&self, tenant_id: &str) -> bool {
        self.tenants.read().contains_key(&TenantId::new(tenant_id))
    }

    pub fn len(&self) -> usize {
        self.tenants.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.tenants.read().is_empty()
    }

    pub fn tenant_ids(&self) -> Vec<TenantId> {
        let mut ids: Vec<TenantId> = self.tenants.read().keys().cloned().collect();
        ids.sort_by(|a, b| a.as_str().cmp(b.as_str()));
        ids
    }

    async fn load_from_store(&self, tenant_id: &TenantId) -> Option<A::Config> {
        let raw = match self.store.get(&Self::store_key(tenant_id)).await {
            Ok(raw) => raw?,
            Err(e) => {
                warn!(adapter = A::NAME, tenant = %tenant_id, "store lookup failed: {e}");
                return None;
            }
        };
        match serde_json::from_str(&raw) {
            Ok(config) => Some(config),
            Err(e) => {
                warn!(
                    adapter = A::NAME,
                    tenant = %tenant_id,
                    "discarding malformed persisted config: {e}"
                );
                None
            }
        }
    }

    async fn persist(&self, config: &A::Config) {
        let raw = match serde_json::to_string(config) {
            Ok(raw) => raw,
            Err(e) => {
                warn!(adapter = A::NAME, "failed to serialize tenant config: {e}");
                return;
            }
        };
        if let Err(e) = self
            .store
            .set(&Self::store_key(config.tenant_id()), &raw)
            .await
        {
            warn!(
                adapter = A::NAME,
                tenant = %config.tenant_id(),
                "failed to persist tenant config: {e}"
            );
        }
    }

    /// Close a replaced or drained entry if no request still holds it.
    async fn release(&self, tenant_id: &TenantId, entry: Arc<RegisteredTenant<A>>) {
        match Arc::try_unwrap(entry) {
            Ok(entry) => self.adapter.close(entry.client).await,
            Err(_) => {
                warn!(
                    adapter = A::NAME,
                    tenant = %tenant_id,
                    "client still in use; skipping close"
                );
            }
        }
    }
}

//! PDF generator adapter: local rendering with a per-tenant output
//! directory.

use std::path::PathBuf;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tenancy::{EnvSource, ServiceAdapter, TenancyResult, TenantConfig, TenantId};

/// Redis database conventionally used for persisted pdf-generator tenant
/// configs.
pub const STORE_DB: u32 = 0;

/// Configuration for a single PDF generator tenant.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PdfTenantConfig {
    pub tenant_id: TenantId,
    /// Directory generated documents are written to; `None` keeps them
    /// in-memory only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub storage_path: Option<String>,
}

impl TenantConfig for PdfTenantConfig {
    const ENV_MARKER: &'static str = "STORAGE_PATH";

    fn tenant_id(&self) -> &TenantId {
        &self.tenant_id
    }

    fn from_env(env: &EnvSource, tenant_id: &TenantId) -> Option<Self> {
        let storage_path = env.var(tenant_id, "STORAGE_PATH")?;
        Some(Self {
            tenant_id: tenant_id.clone(),
            storage_path: Some(storage_path),
        })
    }
}

/// Rendering handle for one tenant. The directory is created lazily on
/// first write, not at construction.
pub struct PdfClient {
    storage_dir: Option<PathBuf>,
}

impl PdfClient {
    pub fn storage_dir(&self) -> Option<&PathBuf> {
        self.storage_dir.as_ref()
    }
}

pub struct PdfGenerator;

#[async_trait]
impl ServiceAdapter for PdfGenerator {
    const NAME: &'static str = "pdf-generator";
    const ENV_PREFIX: &'static str = "PDF_GENERATOR";
    type Config = PdfTenantConfig;
    type Client = PdfClient;

    async fn build(&self, config: &Self::Config) -> TenancyResult<Self::Client> {
        Ok(PdfClient {
            storage_dir: config.storage_path.as_ref().map(PathBuf::from),
        })
    }
}

//! FFmpeg adapter.
//!
//! Transcoding is stateless: no credentials, no connections. The adapter
//! keeps the registry shape so FFmpeg tools go through the same admission
//! gate as every other service.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tenancy::{EnvSource, ServiceAdapter, TenancyResult, TenantConfig, TenantId};

/// Redis database conventionally used for persisted ffmpeg tenant configs.
pub const STORE_DB: u32 = 3;

/// Configuration for FFmpeg (minimal; transcoding needs no per-tenant
/// credentials).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FfmpegTenantConfig {
    #[serde(default)]
    pub tenant_id: TenantId,
}

impl TenantConfig for FfmpegTenantConfig {
    const ENV_MARKER: &'static str = "ENABLED";

    fn tenant_id(&self) -> &TenantId {
        &self.tenant_id
    }

    fn from_env(env: &EnvSource, tenant_id: &TenantId) -> Option<Self> {
        if !env.var_bool(tenant_id, "ENABLED", false) {
            return None;
        }
        Some(Self {
            tenant_id: tenant_id.clone(),
        })
    }
}

/// Stateless handle; tool handlers spawn the `ffmpeg` binary per call.
pub struct FfmpegClient;

pub struct Ffmpeg;

#[async_trait]
impl ServiceAdapter for Ffmpeg {
    const NAME: &'static str = "ffmpeg";
    const ENV_PREFIX: &'static str = "FFMPEG";
    type Config = FfmpegTenantConfig;
    type Client = FfmpegClient;

    async fn build(&self, _config: &Self::Config) -> TenancyResult<Self::Client> {
        Ok(FfmpegClient)
    }
}

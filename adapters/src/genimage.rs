//! Image generation adapter backed by the Runware API.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tenancy::{
    EnvSource, ServiceAdapter, TenancyError, TenancyResult, TenantConfig, TenantId,
    DEFAULT_MAX_CONCURRENT_REQUESTS,
};
use url::Url;

use crate::http;

/// Redis database conventionally used for persisted genImage tenant configs.
pub const STORE_DB: u32 = 7;

const DEFAULT_TIMEOUT_SECS: u64 = 120;

fn default_base_url() -> String {
    "https://api.runware.ai/v1".to_string()
}

fn default_max_concurrent() -> usize {
    DEFAULT_MAX_CONCURRENT_REQUESTS
}

/// Configuration for a single image generation tenant.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GenImageTenantConfig {
    pub tenant_id: TenantId,
    pub runware_api_key: String,
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_max_concurrent")]
    pub max_concurrent_requests: usize,
}

impl TenantConfig for GenImageTenantConfig {
    const ENV_MARKER: &'static str = "RUNWARE_API_KEY";

    fn tenant_id(&self) -> &TenantId {
        &self.tenant_id
    }

    fn from_env(env: &EnvSource, tenant_id: &TenantId) -> Option<Self> {
        let runware_api_key = env.var(tenant_id, "RUNWARE_API_KEY")?;
        Some(Self {
            tenant_id: tenant_id.clone(),
            runware_api_key,
            base_url: env.var_or(tenant_id, "BASE_URL", &default_base_url()),
            max_concurrent_requests: env.var_parsed(
                tenant_id,
                "MAX_CONCURRENT",
                default_max_concurrent(),
            ),
        })
    }

    fn validate(&self) -> TenancyResult<()> {
        if self.runware_api_key.trim().is_empty() {
            return Err(TenancyError::Configuration(
                "runware_api_key must not be empty".to_string(),
            ));
        }
        http::base_url(&self.base_url).map(|_| ())
    }

    fn max_concurrent_requests(&self) -> usize {
        self.max_concurrent_requests
    }
}

/// Authorized HTTP handle for one tenant's Runware account.
pub struct GenImageClient {
    http: reqwest::Client,
    base_url: Url,
}

impl GenImageClient {
    pub fn http(&self) -> &reqwest::Client {
        &self.http
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }
}

pub struct GenImage;

#[async_trait]
impl ServiceAdapter for GenImage {
    const NAME: &'static str = "genImage";
    const ENV_PREFIX: &'static str = "GENIMAGE";
    type Config = GenImageTenantConfig;
    type Client = GenImageClient;

    async fn build(&self, config: &Self::Config) -> TenancyResult<Self::Client> {
        let base_url = http::base_url(&config.base_url)?;
        let headers = http::bearer_headers(&config.runware_api_key)?;
        let client = http::client(headers, Duration::from_secs(DEFAULT_TIMEOUT_SECS))?;
        Ok(GenImageClient {
            http: client,
            base_url,
        })
    }
}

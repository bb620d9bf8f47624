//! Meilisearch adapter: per-tenant HTTP clients.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::HeaderMap;
use serde::{Deserialize, Serialize};
use tenancy::{EnvSource, ServiceAdapter, TenancyResult, TenantConfig, TenantId};
use url::Url;

use crate::http;

/// Redis database conventionally used for persisted meilisearch tenant
/// configs.
pub const STORE_DB: u32 = 5;

/// Configuration for a single Meilisearch tenant.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MeilisearchTenantConfig {
    pub tenant_id: TenantId,
    /// Server URL, e.g. `http://meilisearch.meilisearch:7700`.
    pub url: String,
    /// Master key or search key.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout: u64,
}

fn default_timeout() -> u64 {
    5
}

impl TenantConfig for MeilisearchTenantConfig {
    const ENV_MARKER: &'static str = "URL";

    fn tenant_id(&self) -> &TenantId {
        &self.tenant_id
    }

    fn from_env(env: &EnvSource, tenant_id: &TenantId) -> Option<Self> {
        let url = env.var(tenant_id, "URL")?;
        Some(Self {
            tenant_id: tenant_id.clone(),
            url,
            api_key: env.var(tenant_id, "API_KEY"),
            timeout: env.var_parsed(tenant_id, "TIMEOUT", default_timeout()),
        })
    }

    fn validate(&self) -> TenancyResult<()> {
        http::base_url(&self.url).map(|_| ())
    }
}

/// Authorized HTTP handle for one tenant's Meilisearch server.
pub struct MeilisearchClient {
    http: reqwest::Client,
    base_url: Url,
}

impl MeilisearchClient {
    pub fn http(&self) -> &reqwest::Client {
        &self.http
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }
}

pub struct Meilisearch;

#[async_trait]
impl ServiceAdapter for Meilisearch {
    const NAME: &'static str = "meilisearch";
    const ENV_PREFIX: &'static str = "MEILISEARCH";
    type Config = MeilisearchTenantConfig;
    type Client = MeilisearchClient;

    async fn build(&self, config: &Self::Config) -> TenancyResult<Self::Client> {
        let base_url = http::base_url(&config.url)?;
        let headers = match &config.api_key {
            Some(key) => http::bearer_headers(key)?,
            None => HeaderMap::new(),
        };
        let client = http::client(headers, Duration::from_secs(config.timeout))?;
        Ok(MeilisearchClient {
            http: client,
            base_url,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn config() -> MeilisearchTenantConfig {
        MeilisearchTenantConfig {
            tenant_id: TenantId::new("acme"),
            url: "http://meilisearch.meilisearch:7700".to_string(),
            api_key: Some("master-key".to_string()),
            timeout: 5,
        }
    }

    #[test]
    fn test_validate_requires_http_url() {
        assert!(config().validate().is_ok());

        let mut cfg = config();
        cfg.url = "meilisearch:7700".to_string();
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn test_serde_defaults_timeout() {
        let cfg: MeilisearchTenantConfig =
            serde_json::from_str(r#"{"tenant_id":"acme","url":"http://localhost:7700"}"#).unwrap();
        assert_eq!(cfg.timeout, 5);
        assert_eq!(cfg.api_key, None);
    }

    #[test]
    #[serial]
    fn test_from_env() {
        std::env::set_var("MEILISEARCH_TENANT_ACME_URL", "http://search.internal:7700");
        std::env::set_var("MEILISEARCH_TENANT_ACME_TIMEOUT", "30");
        let env = EnvSource::new("MEILISEARCH");

        let cfg = MeilisearchTenantConfig::from_env(&env, &TenantId::new("acme")).unwrap();
        assert_eq!(cfg.url, "http://search.internal:7700");
        assert_eq!(cfg.timeout, 30);
        assert_eq!(cfg.api_key, None);

        std::env::remove_var("MEILISEARCH_TENANT_ACME_URL");
        std::env::remove_var("MEILISEARCH_TENANT_ACME_TIMEOUT");
    }

    #[tokio::test]
    async fn test_build_without_api_key() {
        let mut cfg = config();
        cfg.api_key = None;
        let client = Meilisearch.build(&cfg).await.unwrap();
        assert_eq!(client.base_url().as_str(), "http://meilisearch.meilisearch:7700/");
    }
}

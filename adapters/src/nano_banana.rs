//! Nano Banana adapter: image generation via the Google Gemini API.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tenancy::{
    EnvSource, ServiceAdapter, TenancyError, TenancyResult, TenantConfig, TenantId,
    DEFAULT_MAX_CONCURRENT_REQUESTS,
};
use url::Url;

use crate::http;

/// Redis database conventionally used for persisted nano-banana tenant
/// configs.
pub const STORE_DB: u32 = 6;

const GEMINI_API_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
const DEFAULT_TIMEOUT_SECS: u64 = 120;

fn default_model() -> String {
    "gemini-2.0-flash-exp".to_string()
}

fn default_max_concurrent() -> usize {
    DEFAULT_MAX_CONCURRENT_REQUESTS
}

/// Configuration for a single Nano Banana tenant.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NanoBananaTenantConfig {
    pub tenant_id: TenantId,
    pub gemini_api_key: String,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_max_concurrent")]
    pub max_concurrent_requests: usize,
}

impl TenantConfig for NanoBananaTenantConfig {
    const ENV_MARKER: &'static str = "GEMINI_API_KEY";

    fn tenant_id(&self) -> &TenantId {
        &self.tenant_id
    }

    fn from_env(env: &EnvSource, tenant_id: &TenantId) -> Option<Self> {
        let gemini_api_key = env.var(tenant_id, "GEMINI_API_KEY")?;
        Some(Self {
            tenant_id: tenant_id.clone(),
            gemini_api_key,
            model: env.var_or(tenant_id, "MODEL", &default_model()),
            max_concurrent_requests: env.var_parsed(
                tenant_id,
                "MAX_CONCURRENT",
                default_max_concurrent(),
            ),
        })
    }

    fn validate(&self) -> TenancyResult<()> {
        if self.gemini_api_key.trim().is_empty() {
            return Err(TenancyError::Configuration(
                "gemini_api_key must not be empty".to_string(),
            ));
        }
        if self.model.trim().is_empty() {
            return Err(TenancyError::Configuration(
                "model must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    fn max_concurrent_requests(&self) -> usize {
        self.max_concurrent_requests
    }
}

/// Authorized HTTP handle for one tenant's Gemini access.
pub struct NanoBananaClient {
    http: reqwest::Client,
    base_url: Url,
    model: String,
}

impl NanoBananaClient {
    pub fn http(&self) -> &reqwest::Client {
        &self.http
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

pub struct NanoBanana;

#[async_trait]
impl ServiceAdapter for NanoBanana {
    const NAME: &'static str = "nano-banana";
    const ENV_PREFIX: &'static str = "NANO_BANANA";
    type Config = NanoBananaTenantConfig;
    type Client = NanoBananaClient;

    async fn build(&self, config: &Self::Config) -> TenancyResult<Self::Client> {
        let base_url = http::base_url(GEMINI_API_URL)?;
        let headers = http::key_header("x-goog-api-key", &config.gemini_api_key)?;
        let client = http::client(headers, Duration::from_secs(DEFAULT_TIMEOUT_SECS))?;
        Ok(NanoBananaClient {
            http: client,
            base_url,
            model: config.model.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn test_serde_defaults_model() {
        let cfg: NanoBananaTenantConfig =
            serde_json::from_str(r#"{"tenant_id":"acme","gemini_api_key":"g-key"}"#).unwrap();
        assert_eq!(cfg.model, "gemini-2.0-flash-exp");
        assert_eq!(cfg.max_concurrent_requests, 10);
    }

    #[test]
    fn test_validate_requires_key_and_model() {
        let mut cfg: NanoBananaTenantConfig =
            serde_json::from_str(r#"{"tenant_id":"acme","gemini_api_key":"g-key"}"#).unwrap();
        assert!(cfg.validate().is_ok());

        cfg.model = String::new();
        assert!(cfg.validate().is_err());
    }

    #[test]
    #[serial]
    fn test_from_env() {
        std::env::set_var("NANO_BANANA_TENANT_ACME_GEMINI_API_KEY", "g-key");
        std::env::set_var("NANO_BANANA_TENANT_ACME_MODEL", "gemini-1.5-pro");
        let env = EnvSource::new("NANO_BANANA");

        let cfg = NanoBananaTenantConfig::from_env(&env, &TenantId::new("acme")).unwrap();
        assert_eq!(cfg.gemini_api_key, "g-key");
        assert_eq!(cfg.model, "gemini-1.5-pro");

        std::env::remove_var("NANO_BANANA_TENANT_ACME_GEMINI_API_KEY");
        std::env::remove_var("NANO_BANANA_TENANT_ACME_MODEL");
    }

    #[tokio::test]
    async fn test_build_carries_model() {
        let cfg: NanoBananaTenantConfig =
            serde_json::from_str(r#"{"tenant_id":"acme","gemini_api_key":"g-key"}"#).unwrap();
        let client = NanoBanana.build(&cfg).await.unwrap();
        assert_eq!(client.model(), "gemini-2.0-flash-exp");
    }
}

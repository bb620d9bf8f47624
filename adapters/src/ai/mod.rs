//! AI gateway adapter: an OpenAI-compatible backend per tenant, plus
//! optional per-provider auxiliary clients.
//!
//! The `global` tenant talks to the shared GPU backend only; every other
//! tenant additionally gets a provider client for each API key present in
//! its config.

pub mod providers;

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::HeaderMap;
use serde::{Deserialize, Serialize};
use tenancy::{
    EnvSource, ServiceAdapter, TenancyResult, TenantConfig, TenantId,
    DEFAULT_MAX_CONCURRENT_REQUESTS,
};
use url::Url;

use crate::http;
use providers::{ProviderClient, ProviderRole};

/// Redis database conventionally used for persisted AI tenant configs.
pub const STORE_DB: u32 = 8;

/// The shared-backend tenant; it gets no provider clients.
pub const GLOBAL_TENANT: &str = "global";

fn default_timeout() -> u64 {
    300
}

fn default_max_concurrent() -> usize {
    DEFAULT_MAX_CONCURRENT_REQUESTS
}

/// Configuration for a single AI tenant with multi-provider support.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AiTenantConfig {
    pub tenant_id: TenantId,
    /// OpenAI-compatible GPU backend for this tenant.
    pub api_base_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    /// OpenRouter API key for LLM and STT services.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub openrouter_api_key: Option<String>,
    /// Eleven Labs API key for TTS.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub elevenlabs_api_key: Option<String>,
    /// OpenAI API key for embeddings.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub openai_api_key: Option<String>,
    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout: u64,
    #[serde(default = "default_max_concurrent")]
    pub max_concurrent_requests: usize,
}

impl TenantConfig for AiTenantConfig {
    const ENV_MARKER: &'static str = "API_BASE_URL";

    fn tenant_id(&self) -> &TenantId {
        &self.tenant_id
    }

    fn from_env(env: &EnvSource, tenant_id: &TenantId) -> Option<Self> {
        // A tenant-specific base URL, or the deployment-wide default.
        let api_base_url = env.var(tenant_id, "API_BASE_URL").or_else(|| {
            std::env::var("AI_MCP_SERVER_DEFAULT_API_BASE_URL")
                .ok()
                .filter(|v| !v.is_empty())
        })?;
        Some(Self {
            tenant_id: tenant_id.clone(),
            api_base_url,
            api_key: env.var(tenant_id, "API_KEY"),
            openrouter_api_key: env.var(tenant_id, "OPENROUTER_API_KEY"),
            elevenlabs_api_key: env.var(tenant_id, "ELEVENLABS_API_KEY"),
            openai_api_key: env.var(tenant_id, "OPENAI_API_KEY"),
            timeout: env.var_parsed(tenant_id, "TIMEOUT", default_timeout()),
            max_concurrent_requests: env.var_parsed(
                tenant_id,
                "MAX_CONCURRENT",
                default_max_concurrent(),
            ),
        })
    }

    fn validate(&self) -> TenancyResult<()> {
        http::base_url(&self.api_base_url).map(|_| ())
    }

    fn max_concurrent_requests(&self) -> usize {
        self.max_concurrent_requests
    }
}

/// Main backend client plus auxiliary provider clients keyed by role.
pub struct AiClient {
    http: reqwest::Client,
    base_url: Url,
    providers: HashMap<ProviderRole, ProviderClient>,
}

impl AiClient {
    pub fn http(&self) -> &reqwest::Client {
        &self.http
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn provider(&self, role: ProviderRole) -> Option<&ProviderClient> {
        self.providers.get(&role)
    }

    pub fn provider_roles(&self) -> Vec<ProviderRole> {
        let mut roles: Vec<ProviderRole> = self.providers.keys().copied().collect();
        roles.sort();
        roles
    }
}

pub struct Ai;

#[async_trait]
impl ServiceAdapter for Ai {
    const NAME: &'static str = "ai-mcp-server";
    const ENV_PREFIX: &'static str = "AI_MCP_SERVER";
    type Config = AiTenantConfig;
    type Client = AiClient;

    async fn build(&self, config: &Self::Config) -> TenancyResult<Self::Client> {
        let base_url = http::base_url(&config.api_base_url)?;
        let headers = match &config.api_key {
            Some(key) => http::bearer_headers(key)?,
            None => HeaderMap::new(),
        };
        let timeout = Duration::from_secs(config.timeout);
        let client = http::client(headers, timeout)?;

        let mut providers = HashMap::new();
        if config.tenant_id.as_str() != GLOBAL_TENANT {
            if let Some(key) = &config.openrouter_api_key {
                providers.insert(
                    ProviderRole::OpenRouter,
                    ProviderClient::open_router(key, timeout)?,
                );
            }
            if let Some(key) = &config.elevenlabs_api_key {
                providers.insert(
                    ProviderRole::ElevenLabs,
                    ProviderClient::eleven_labs(key, timeout)?,
                );
            }
            if let Some(key) = &config.openai_api_key {
                providers.insert(ProviderRole::OpenAi, ProviderClient::open_ai(key, timeout)?);
            }
        }

        Ok(AiClient {
            http: client,
            base_url,
            providers,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn config(tenant_id: &str) -> AiTenantConfig {
        AiTenantConfig {
            tenant_id: TenantId::new(tenant_id),
            api_base_url: "http://gpu-ai.internal:8000".to_string(),
            api_key: None,
            openrouter_api_key: Some("or-key".to_string()),
            elevenlabs_api_key: Some("el-key".to_string()),
            openai_api_key: None,
            timeout: 300,
            max_concurrent_requests: 10,
        }
    }

    #[test]
    fn test_serde_defaults() {
        let cfg: AiTenantConfig = serde_json::from_str(
            r#"{"tenant_id":"acme","api_base_url":"http://gpu-ai.internal:8000"}"#,
        )
        .unwrap();
        assert_eq!(cfg.timeout, 300);
        assert_eq!(cfg.max_concurrent_requests, 10);
        assert_eq!(cfg.openrouter_api_key, None);
    }

    #[tokio::test]
    async fn test_build_creates_providers_for_present_keys() {
        let client = Ai.build(&config("acme")).await.unwrap();
        assert_eq!(
            client.provider_roles(),
            vec![ProviderRole::OpenRouter, ProviderRole::ElevenLabs]
        );
        assert!(client.provider(ProviderRole::OpenAi).is_none());
    }

    #[tokio::test]
    async fn test_global_tenant_gets_no_providers() {
        let client = Ai.build(&config(GLOBAL_TENANT)).await.unwrap();
        assert!(client.provider_roles().is_empty());
    }

    #[test]
    #[serial]
    fn test_from_env_requires_a_base_url() {
        std::env::remove_var("AI_MCP_SERVER_DEFAULT_API_BASE_URL");
        let env = EnvSource::new("AI_MCP_SERVER");
        assert!(AiTenantConfig::from_env(&env, &TenantId::new("acme")).is_none());

        std::env::set_var(
            "AI_MCP_SERVER_TENANT_ACME_API_BASE_URL",
            "http://gpu-a.internal:8000",
        );
        let cfg = AiTenantConfig::from_env(&env, &TenantId::new("acme")).unwrap();
        assert_eq!(cfg.api_base_url, "http://gpu-a.internal:8000");

        std::env::remove_var("AI_MCP_SERVER_TENANT_ACME_API_BASE_URL");
    }

    #[test]
    #[serial]
    fn test_from_env_falls_back_to_deployment_default() {
        std::env::set_var(
            "AI_MCP_SERVER_DEFAULT_API_BASE_URL",
            "http://gpu-shared.internal:8000",
        );
        let env = EnvSource::new("AI_MCP_SERVER");

        let cfg = AiTenantConfig::from_env(&env, &TenantId::new("acme")).unwrap();
        assert_eq!(cfg.api_base_url, "http://gpu-shared.internal:8000");

        std::env::remove_var("AI_MCP_SERVER_DEFAULT_API_BASE_URL");
    }
}

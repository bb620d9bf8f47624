//! Mail adapter: per-tenant clients for the internal mail API.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tenancy::{EnvSource, ServiceAdapter, TenancyError, TenancyResult, TenantConfig, TenantId};
use url::Url;

use crate::http;

/// Redis database conventionally used for persisted mail tenant configs.
pub const STORE_DB: u32 = 3;

const DEFAULT_TIMEOUT_SECS: u64 = 30;

fn default_mail_api_url() -> String {
    // Kubernetes internal DNS of the mail service.
    "http://mail-service.mail".to_string()
}

/// Configuration for a single mail service tenant.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MailTenantConfig {
    pub tenant_id: TenantId,
    /// JWT token for mail API authentication.
    pub api_key: String,
    #[serde(default = "default_mail_api_url")]
    pub mail_api_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_from_email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_from_name: Option<String>,
}

impl TenantConfig for MailTenantConfig {
    const ENV_MARKER: &'static str = "API_KEY";

    fn tenant_id(&self) -> &TenantId {
        &self.tenant_id
    }

    fn from_env(env: &EnvSource, tenant_id: &TenantId) -> Option<Self> {
        let api_key = env.var(tenant_id, "API_KEY")?;
        Some(Self {
            tenant_id: tenant_id.clone(),
            api_key,
            mail_api_url: env.var_or(tenant_id, "MAIL_API_URL", &default_mail_api_url()),
            default_from_email: env.var(tenant_id, "DEFAULT_FROM_EMAIL"),
            default_from_name: env.var(tenant_id, "DEFAULT_FROM_NAME"),
        })
    }

    fn validate(&self) -> TenancyResult<()> {
        if self.api_key.trim().is_empty() {
            return Err(TenancyError::Configuration(
                "api_key must not be empty".to_string(),
            ));
        }
        http::base_url(&self.mail_api_url).map(|_| ())
    }
}

/// Authorized HTTP handle for one tenant's mail API.
pub struct MailClient {
    http: reqwest::Client,
    base_url: Url,
}

impl MailClient {
    pub fn http(&self) -> &reqwest::Client {
        &self.http
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }
}

pub struct Mail;

#[async_trait]
impl ServiceAdapter for Mail {
    const NAME: &'static str = "mail";
    const ENV_PREFIX: &'static str = "MAIL";
    type Config = MailTenantConfig;
    type Client = MailClient;

    async fn build(&self, config: &Self::Config) -> TenancyResult<Self::Client> {
        let base_url = http::base_url(&config.mail_api_url)?;
        let headers = http::bearer_headers(&config.api_key)?;
        let client = http::client(headers, Duration::from_secs(DEFAULT_TIMEOUT_SECS))?;
        Ok(MailClient {
            http: client,
            base_url,
        })
    }
}

//! MinIO adapter: S3-compatible object storage handles.

use async_trait::async_trait;
use object_store::aws::{AmazonS3, AmazonS3Builder};
use serde::{Deserialize, Serialize};
use tenancy::{EnvSource, ServiceAdapter, TenancyError, TenancyResult, TenantConfig, TenantId};

/// Redis database conventionally used for persisted minio tenant configs.
pub const STORE_DB: u32 = 0;

const DEFAULT_REGION: &str = "us-east-1";

/// Configuration for a single MinIO tenant.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MinioTenantConfig {
    pub tenant_id: TenantId,
    /// Host and port, e.g. `minio.example.com:9000` (no scheme).
    pub endpoint: String,
    #[serde(default)]
    pub access_key: String,
    #[serde(default)]
    pub secret_key: String,
    #[serde(default = "default_secure")]
    pub secure: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
}

fn default_secure() -> bool {
    true
}

impl MinioTenantConfig {
    pub fn endpoint_url(&self) -> String {
        let scheme = if self.secure { "https" } else { "http" };
        format!("{scheme}://{}", self.endpoint)
    }
}

impl TenantConfig for MinioTenantConfig {
    const ENV_MARKER: &'static str = "ENDPOINT";

    fn tenant_id(&self) -> &TenantId {
        &self.tenant_id
    }

    fn from_env(env: &EnvSource, tenant_id: &TenantId) -> Option<Self> {
        let endpoint = env.var(tenant_id, "ENDPOINT")?;
        Some(Self {
            tenant_id: tenant_id.clone(),
            endpoint,
            access_key: env.var_or(tenant_id, "ACCESS_KEY", ""),
            secret_key: env.var_or(tenant_id, "SECRET_KEY", ""),
            secure: env.var_bool(tenant_id, "SECURE", true),
            region: env.var(tenant_id, "REGION"),
        })
    }

    fn validate(&self) -> TenancyResult<()> {
        if self.endpoint.trim().is_empty() {
            return Err(TenancyError::Configuration(
                "endpoint must not be empty".to_string(),
            ));
        }
        if self.endpoint.contains("://") {
            return Err(TenancyError::Configuration(
                "endpoint must be host:port without a scheme".to_string(),
            ));
        }
        Ok(())
    }
}

/// Per-tenant handle that scopes bucket stores on demand.
///
/// The S3 client type is bucket-scoped, so the tenant handle keeps the
/// credentials and materializes a store per bucket; construction is cheap
/// and performs no I/O.
pub struct MinioClient {
    endpoint_url: String,
    access_key: String,
    secret_key: String,
    region: String,
    allow_http: bool,
}

impl MinioClient {
    pub fn endpoint_url(&self) -> &str {
        &self.endpoint_url
    }

    pub fn bucket(&self, bucket: &str) -> TenancyResult<AmazonS3> {
        AmazonS3Builder::new()
            .with_endpoint(&self.endpoint_url)
            .with_bucket_name(bucket)
            .with_access_key_id(&self.access_key)
            .with_secret_access_key(&self.secret_key)
            .with_region(&self.region)
            .with_allow_http(self.allow_http)
            .with_virtual_hosted_style_request(false)
            .build()
            .map_err(|e| TenancyError::Configuration(e.to_string()))
    }
}

pub struct Minio;

#[async_trait]
impl ServiceAdapter for Minio {
    const NAME: &'static str = "minio";
    const ENV_PREFIX: &'static str = "MINIO";
    type Config = MinioTenantConfig;
    type Client = MinioClient;

    async fn build(&self, config: &Self::Config) -> TenancyResult<Self::Client> {
        Ok(MinioClient {
            endpoint_url: config.endpoint_url(),
            access_key: config.access_key.clone(),
            secret_key: config.secret_key.clone(),
            region: config
                .region
                .clone()
                .unwrap_or_else(|| DEFAULT_REGION.to_string()),
            allow_http: !config.secure,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn config() -> MinioTenantConfig {
        MinioTenantConfig {
            tenant_id: TenantId::new("acme"),
            endpoint: "minio.example.com:9000".to_string(),
            access_key: "AKIA".to_string(),
            secret_key: "secret".to_string(),
            secure: true,
            region: None,
        }
    }

    #[test]
    fn test_endpoint_url_follows_secure_flag() {
        assert_eq!(config().endpoint_url(), "https://minio.example.com:9000");

        let mut cfg = config();
        cfg.secure = false;
        assert_eq!(cfg.endpoint_url(), "http://minio.example.com:9000");
    }

    #[test]
    fn test_validate_rejects_scheme_in_endpoint() {
        let mut cfg = config();
        cfg.endpoint = "https://minio.example.com:9000".to_string();
        assert!(cfg.validate().is_err());
    }

    #[test]
    #[serial]
    fn test_from_env() {
        std::env::set_var("MINIO_TENANT_ACME_ENDPOINT", "minio.internal:9000");
        std::env::set_var("MINIO_TENANT_ACME_ACCESS_KEY", "key");
        std::env::set_var("MINIO_TENANT_ACME_SECURE", "false");
        let env = EnvSource::new("MINIO");

        let cfg = MinioTenantConfig::from_env(&env, &TenantId::new("acme")).unwrap();
        assert_eq!(cfg.endpoint, "minio.internal:9000");
        assert_eq!(cfg.access_key, "key");
        assert!(!cfg.secure);
        assert_eq!(cfg.region, None);

        std::env::remove_var("MINIO_TENANT_ACME_ENDPOINT");
        std::env::remove_var("MINIO_TENANT_ACME_ACCESS_KEY");
        std::env::remove_var("MINIO_TENANT_ACME_SECURE");
    }

    #[tokio::test]
    async fn test_build_then_scope_a_bucket() {
        let mut cfg = config();
        cfg.secure = false;
        let client = Minio.build(&cfg).await.unwrap();
        assert_eq!(client.endpoint_url(), "http://minio.example.com:9000");
        assert!(client.bucket("reports").is_ok());
    }
}

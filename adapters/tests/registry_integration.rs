//! End-to-end: real adapters driven through the generic tenant registry.

use std::sync::Arc;

use adapters::meilisearch::{Meilisearch, MeilisearchTenantConfig};
use adapters::postgres::{Postgres, PostgresTenantConfig};
use config_store::{ConfigStore, MemoryStore};
use serial_test::serial;
use tenancy::{TenancyError, TenantId, TenantRegistry};

fn postgres_config(tenant_id: &str, host: &str) -> PostgresTenantConfig {
    PostgresTenantConfig {
        tenant_id: TenantId::new(tenant_id),
        host: host.to_string(),
        port: 5432,
        database: "app".to_string(),
        user: "postgres".to_string(),
        password: String::new(),
        min_pool_size: 2,
        max_pool_size: 4,
        ssl: false,
    }
}

#[tokio::test]
async fn test_postgres_tenant_lifecycle() {
    let store = Arc::new(MemoryStore::new());
    let registry = TenantRegistry::new(Postgres, Arc::clone(&store) as Arc<dyn ConfigStore>);

    registry
        .register_tenant(postgres_config("acme", "db-acme.internal"))
        .await
        .unwrap();

    // The pool is bounded by the config and the gate mirrors it.
    let entry = registry.get_client("acme").await.unwrap();
    assert_eq!(entry.client().pool().status().max_size, 4);
    assert_eq!(entry.available_permits(), 4);

    // The config was persisted under the adapter namespace.
    let raw = store.get("mcp:postgres:tenant:acme").await.unwrap().unwrap();
    let persisted: PostgresTenantConfig = serde_json::from_str(&raw).unwrap();
    assert_eq!(persisted, *entry.config());

    // After shutdown the tenant resolves again from the persisted config.
    drop(entry);
    registry.close_all().await;
    assert!(registry.is_empty());
    let entry = registry.get_client("acme").await.unwrap();
    assert_eq!(entry.config().host, "db-acme.internal");
}

#[tokio::test]
async fn test_unknown_postgres_tenant_fails_fast() {
    let registry = TenantRegistry::new(Postgres, Arc::new(MemoryStore::new()));

    let err = registry.get_client("ghost").await.unwrap_err();
    assert!(matches!(err, TenancyError::TenantNotFound(_)));
    assert!(err.to_string().contains("ghost"));
}

#[tokio::test]
#[serial]
async fn test_meilisearch_tenant_resolves_from_environment() {
    std::env::set_var(
        "MEILISEARCH_TENANT_SEARCHCO_URL",
        "http://search.internal:7700",
    );
    let registry = TenantRegistry::new(Meilisearch, Arc::new(MemoryStore::new()));

    let entry = registry.get_client("searchco").await.unwrap();
    assert_eq!(entry.config().url, "http://search.internal:7700");
    assert_eq!(entry.client().base_url().as_str(), "http://search.internal:7700/");

    std::env::remove_var("MEILISEARCH_TENANT_SEARCHCO_URL");
}

#[tokio::test]
#[serial]
async fn test_meilisearch_initialize_discovers_env_tenants() {
    std::env::set_var("MEILISEARCH_TENANT_ONE_URL", "http://one.internal:7700");
    std::env::set_var("MEILISEARCH_TENANT_TWO_URL", "http://two.internal:7700");
    let registry = TenantRegistry::new(Meilisearch, Arc::new(MemoryStore::new()));

    registry.initialize().await.unwrap();
    assert!(registry.contains("one"));
    assert!(registry.contains("two"));

    std::env::remove_var("MEILISEARCH_TENANT_ONE_URL");
    std::env::remove_var("MEILISEARCH_TENANT_TWO_URL");
}

#[tokio::test]
async fn test_invalid_meilisearch_registration_is_rejected() {
    let registry = TenantRegistry::new(Meilisearch, Arc::new(MemoryStore::new()));

    let config = MeilisearchTenantConfig {
        tenant_id: TenantId::new("bad"),
        url: "not-a-url".to_string(),
        api_key: None,
        timeout: 5,
    };
    let err = registry.register_tenant(config).await.unwrap_err();
    assert!(matches!(err, TenancyError::Configuration(_)));
    assert!(!registry.contains("bad"));
}

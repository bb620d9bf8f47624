// core.rs
//
// Trait and error types shared by all store backends.

use async_trait::async_trait;

/// Result alias for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Error type for store operations
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Store unavailable: {0}")]
    Unavailable(String),

    #[error("Store operation failed: {0}")]
    Operation(String),
}

/// Namespaced key-value store holding serialized tenant configurations.
///
/// Values are plain structured data, never client handles. Durability is an
/// optimization, not a correctness requirement: registries absorb every
/// error from this interface and fall back to other configuration sources.
#[async_trait]
pub trait ConfigStore: Send + Sync + 'static {
    async fn get(&self, key: &str) -> StoreResult<Option<String>>;

    async fn set(&self, key: &str, value: &str) -> StoreResult<()>;

    /// Keys matching a glob-style pattern. Only the trailing-`*` form is
    /// required by callers.
    async fn keys(&self, pattern: &str) -> StoreResult<Vec<String>>;

    /// Connectivity probe.
    async fn ping(&self) -> StoreResult<bool>;

    /// Release the store connection. Subsequent operations may fail; the
    /// owning registry is expected to be shutting down.
    async fn close(&self);
}

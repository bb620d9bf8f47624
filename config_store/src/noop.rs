//! No-op store backend, used when persistence is disabled.

use async_trait::async_trait;

use crate::core::{ConfigStore, StoreResult};

/// Accepts every write and remembers nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopStore;

#[async_trait]
impl ConfigStore for NoopStore {
    async fn get(&self, _key: &str) -> StoreResult<Option<String>> {
        Ok(None)
    }

    async fn set(&self, _key: &str, _value: &str) -> StoreResult<()> {
        Ok(())
    }

    async fn keys(&self, _pattern: &str) -> StoreResult<Vec<String>> {
        Ok(Vec::new())
    }

    async fn ping(&self) -> StoreResult<bool> {
        Ok(false)
    }

    async fn close(&self) {}
}

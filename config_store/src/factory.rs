//! Store construction from backend configuration.

use std::sync::Arc;

use crate::{
    config::{RedisConfig, StoreBackend},
    core::{ConfigStore, StoreResult},
    memory::MemoryStore,
    noop::NoopStore,
    redis::RedisStore,
};

/// Backend selection plus backend-specific settings.
#[derive(Debug, Clone, Default)]
pub struct StoreFactoryConfig {
    pub backend: StoreBackend,
    pub redis: Option<RedisConfig>,
}

pub fn create_store(config: StoreFactoryConfig) -> StoreResult<Arc<dyn ConfigStore>> {
    match config.backend {
        StoreBackend::Memory => Ok(Arc::new(MemoryStore::new())),
        StoreBackend::None => Ok(Arc::new(NoopStore)),
        StoreBackend::Redis => {
            let redis = config.redis.unwrap_or_else(|| RedisConfig::from_env(0));
            Ok(Arc::new(RedisStore::new(redis)?))
        }
    }
}

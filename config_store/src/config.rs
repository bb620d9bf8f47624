//! Store backend configuration types.

use serde::{Deserialize, Serialize};
use url::Url;

/// Store backend selection
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    #[default]
    Memory,
    None,
    Redis,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RedisConfig {
    // Redis connection URL
    // redis://[:password@]host[:port][/db]
    pub url: String,
    // Connection pool max size
    #[serde(default = "default_redis_pool_max")]
    pub pool_max: usize,
}

fn default_redis_pool_max() -> usize {
    16
}

impl RedisConfig {
    /// Build from `REDIS_HOST` / `REDIS_PORT` / `REDIS_DB` / `REDIS_PASSWORD`,
    /// with an adapter-specific default database number.
    pub fn from_env(default_db: u32) -> Self {
        let host = std::env::var("REDIS_HOST").unwrap_or_else(|_| "redis".to_string());
        let port: u16 = std::env::var("REDIS_PORT")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(6379);
        let db: u32 = std::env::var("REDIS_DB")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(default_db);
        let auth = std::env::var("REDIS_PASSWORD")
            .ok()
            .filter(|v| !v.is_empty())
            .map(|p| format!(":{p}@"))
            .unwrap_or_default();

        Self {
            url: format!("redis://{auth}{host}:{port}/{db}"),
            pool_max: default_redis_pool_max(),
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        let s = self.url.trim();
        if s.is_empty() {
            return Err("redis url should not be empty".to_string());
        }

        let url = Url::parse(s).map_err(|e| format!("invalid redis url: {}", e))?;

        let scheme = url.scheme();
        if scheme != "redis" && scheme != "rediss" {
            return Err(format!("unsupported URL scheme: {}", scheme));
        }

        if url.host().is_none() {
            return Err("redis url must have a host".to_string());
        }

        if self.pool_max == 0 {
            return Err("pool_max must be greater than 0".to_string());
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn test_validate_accepts_plain_and_tls_urls() {
        let config = RedisConfig {
            url: "redis://localhost:6379/0".to_string(),
            pool_max: 16,
        };
        assert!(config.validate().is_ok());

        let config = RedisConfig {
            url: "rediss://cache.internal:6380/3".to_string(),
            pool_max: 4,
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_input() {
        let config = RedisConfig {
            url: "http://localhost:6379".to_string(),
            pool_max: 16,
        };
        assert!(config.validate().is_err());

        let config = RedisConfig {
            url: "redis://localhost:6379/0".to_string(),
            pool_max: 0,
        };
        assert!(config.validate().is_err());
    }

    #[test]
    #[serial]
    fn test_from_env_defaults() {
        std::env::remove_var("REDIS_HOST");
        std::env::remove_var("REDIS_PORT");
        std::env::remove_var("REDIS_DB");
        std::env::remove_var("REDIS_PASSWORD");

        let config = RedisConfig::from_env(5);
        assert_eq!(config.url, "redis://redis:6379/5");
    }

    #[test]
    #[serial]
    fn test_from_env_reads_overrides() {
        std::env::set_var("REDIS_HOST", "cache.internal");
        std::env::set_var("REDIS_PORT", "6380");
        std::env::set_var("REDIS_DB", "8");
        std::env::set_var("REDIS_PASSWORD", "hunter2");

        let config = RedisConfig::from_env(0);
        assert_eq!(config.url, "redis://:hunter2@cache.internal:6380/8");

        std::env::remove_var("REDIS_HOST");
        std::env::remove_var("REDIS_PORT");
        std::env::remove_var("REDIS_DB");
        std::env::remove_var("REDIS_PASSWORD");
    }
}

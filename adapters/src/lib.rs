//! Service adapters for the tenant registry.
//!
//! One module per integration. Each supplies a typed tenant configuration,
//! a [`tenancy::ServiceAdapter`] implementation (the client factory), and a
//! client wrapper owning the live connection handle(s). The actual upstream
//! operations live with the tool handlers, not here.
//!
//! Every adapter also exposes a `STORE_DB` constant: the Redis database its
//! deployment conventionally persists tenant configs in, for
//! `config_store::RedisConfig::from_env`.

mod http;

pub mod ai;
pub mod ffmpeg;
pub mod genimage;
pub mod mail;
pub mod meilisearch;
pub mod minio;
pub mod nano_banana;
pub mod pdf;
pub mod postgres;

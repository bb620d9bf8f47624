//! Multi-tenant client registry and lifecycle management.
//!
//! Every service adapter follows the same shape: a typed tenant
//! configuration, a client factory, and a registry that resolves tenants
//! lazily through a fixed-priority source chain (in-memory cache, persistent
//! store, process environment), memoizes the constructed clients, and tears
//! everything down at shutdown.
//!
//! ## Modules
//!
//! - [`registry`]: the generic [`TenantRegistry`] (resolution, memoization, shutdown)
//! - [`adapter`]: the [`ServiceAdapter`] factory seam each service implements
//! - [`config`]: the [`TenantConfig`] contract
//! - [`env`]: environment variable source (`<PREFIX>_TENANT_<ID>_<FIELD>`)
//! - [`error`]: the error taxonomy surfaced to tool handlers

pub mod adapter;
pub mod config;
pub mod env;
pub mod error;
pub mod registry;
pub mod tenant;

pub use adapter::ServiceAdapter;
pub use config::{TenantConfig, DEFAULT_MAX_CONCURRENT_REQUESTS};
pub use env::EnvSource;
pub use error::{TenancyError, TenancyResult};
pub use registry::{RegisteredTenant, TenantRegistry};
pub use tenant::TenantId;

//! Error types for tenant resolution and registration.

use thiserror::Error;

pub type TenancyResult<T> = Result<T, TenancyError>;

#[derive(Debug, Error)]
pub enum TenancyError {
    /// No source in the configuration chain produced a config for this
    /// tenant.
    #[error("Tenant '{0}' not found. Register it programmatically or configure it via environment variables.")]
    TenantNotFound(String),

    /// Malformed or incomplete tenant configuration. Never retried; the
    /// registry's prior state is left untouched.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The underlying service failed during a real operation. The registry
    /// never masks these and never retries them.
    #[error("Upstream unavailable: {0}")]
    UpstreamUnavailable(String),
}

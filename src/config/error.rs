//! Configuration errors.

use thiserror::Error;

/// Failure to produce a usable `AppConfig`.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A source could not be read or a value did not parse.
    #[error("failed to load configuration: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("invalid configuration: {0}")]
    ValidationFailed(#[from] ValidationError),
}

/// A loaded value that is out of range or inconsistent.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{0} is required")]
    MissingRequired(&'static str),

    // server
    #[error("server.port must be non-zero")]
    InvalidPort,
    #[error("server.host '{0}' is not an IP address")]
    InvalidBindAddress(String),
    #[error("timeout must be non-zero")]
    InvalidTimeout,

    // database / redis
    #[error("database.url must use postgres:// or postgresql://")]
    InvalidDatabaseUrl,
    #[error("redis.url must use redis:// or rediss://")]
    InvalidRedisUrl,
    #[error("database pool needs 1 <= min_connections <= max_connections")]
    InvalidPoolSize,
    #[error("database.max_connections may not exceed 100")]
    PoolSizeTooLarge,

    // auth
    #[error("the {0} JWT secret must be a non-default value of at least 32 bytes in production")]
    WeakJwtSecret(&'static str),
    #[error("auth access and refresh secrets must differ")]
    SharedJwtSecret,
    #[error("token TTLs must be positive and the refresh TTL must exceed the access TTL")]
    InvalidTokenTtl,

    // rate limiting and jobs
    #[error("rate_limit.policies.{operation}: {reason}")]
    InvalidRateLimitPolicy { operation: String, reason: String },
    #[error("rate_limit.store_timeout_ms must be within 1..=10000")]
    InvalidStoreTimeout,
    #[error("jobs.poll_timeout_secs must be within 1..=60")]
    InvalidPollTimeout,
}

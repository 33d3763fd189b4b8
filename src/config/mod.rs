//! Application configuration module
//!
//! Typed configuration loaded with the `config` and `dotenvy` crates. Values
//! come from an optional `taskflow.{yaml,toml,json}` file in the working
//! directory, overridden by environment variables with the `TASKFLOW` prefix.
//! Nested values use double underscores as separators.
//!
//! # Example
//!
//! ```no_run
//! use taskflow::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//! ```

mod auth;
mod database;
mod error;
mod jobs;
mod rate_limit;
mod redis;
mod server;

pub use auth::{AuthConfig, DEV_ACCESS_SECRET, DEV_REFRESH_SECRET};
pub use database::DatabaseConfig;
pub use error::{ConfigError, ValidationError};
pub use jobs::JobsConfig;
pub use rate_limit::{PolicyOverride, RateLimitConfig};
pub use self::redis::RedisConfig;
pub use server::{Environment, LogFormat, ServerConfig};

use serde::Deserialize;

/// Root application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Server configuration (host, port, environment, logging)
    #[serde(default)]
    pub server: ServerConfig,

    /// Database configuration (PostgreSQL connection)
    pub database: DatabaseConfig,

    /// Redis configuration (rate limit store and job queue)
    pub redis: RedisConfig,

    /// JWT signing configuration
    #[serde(default)]
    pub auth: AuthConfig,

    #[serde(default)]
    pub rate_limit: RateLimitConfig,

    #[serde(default)]
    pub jobs: JobsConfig,
}

impl AppConfig {
    /// Load configuration from file and environment
    ///
    /// This function:
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads `taskflow.{yaml,toml,json}` if present
    /// 3. Reads environment variables with `TASKFLOW` prefix
    /// 4. Deserializes into typed configuration structs
    ///
    /// # Environment Variable Format
    ///
    /// - `TASKFLOW__SERVER__PORT=8080` -> `server.port = 8080`
    /// - `TASKFLOW__DATABASE__URL=...` -> `database.url = ...`
    /// - `TASKFLOW__RATE_LIMIT__FAILURE_POLICY=fail_closed`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if:
    /// - Required values are missing
    /// - Values cannot be parsed into expected types
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(config::File::with_name("taskflow").required(false))
            .add_source(
                config::Environment::default()
                    .prefix("TASKFLOW")
                    .prefix_separator("__")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` for the first invalid section.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.server.validate()?;
        self.database.validate()?;
        self.redis.validate()?;
        self.auth.validate(&self.server.environment)?;
        self.rate_limit.validate()?;
        self.jobs.validate()?;
        Ok(())
    }

    /// Check if running in production environment
    pub fn is_production(&self) -> bool {
        self.server.is_production()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::rate_limiter::{operations, FailurePolicy, RateLimitStrategy};
    use std::env;
    use std::sync::Mutex;

    // Env vars are process-global.
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    const VARS: &[&str] = &[
        "TASKFLOW__DATABASE__URL",
        "TASKFLOW__REDIS__URL",
        "TASKFLOW__SERVER__PORT",
        "TASKFLOW__SERVER__ENVIRONMENT",
        "TASKFLOW__SERVER__LOG_FORMAT",
        "TASKFLOW__RATE_LIMIT__FAILURE_POLICY",
        "TASKFLOW__RATE_LIMIT__STRATEGY",
        "TASKFLOW__RATE_LIMIT__POLICIES__LOGIN__LIMIT",
        "TASKFLOW__RATE_LIMIT__POLICIES__LOGIN__WINDOW_MS",
        "TASKFLOW__JOBS__WORKER_ENABLED",
    ];

    fn set_minimal_env() {
        env::set_var("TASKFLOW__DATABASE__URL", "postgresql://test@localhost/test");
        env::set_var("TASKFLOW__REDIS__URL", "redis://localhost:6379");
    }

    fn clear_env() {
        for var in VARS {
            env::remove_var(var);
        }
    }

    fn load_with(extra: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
        set_minimal_env();
        for (key, value) in extra {
            env::set_var(key, value);
        }
        let result = AppConfig::load();
        clear_env();
        result
    }

    #[test]
    fn test_load_from_environment() {
        let _guard = ENV_MUTEX.lock().unwrap();
        let config = load_with(&[]).expect("config loads");

        assert_eq!(config.database.url, "postgresql://test@localhost/test");
        assert_eq!(config.redis.url, "redis://localhost:6379");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_section_defaults() {
        let _guard = ENV_MUTEX.lock().unwrap();
        let config = load_with(&[]).unwrap();

        assert_eq!(config.server.port, 3000);
        assert_eq!(config.server.environment, Environment::Development);
        assert_eq!(config.rate_limit.failure_policy, FailurePolicy::FailOpen);
        assert!(config.jobs.worker_enabled);
        assert_eq!(config.auth.issuer, "taskflow");
    }

    #[test]
    fn test_nested_overrides() {
        let _guard = ENV_MUTEX.lock().unwrap();
        let config = load_with(&[
            ("TASKFLOW__SERVER__PORT", "8081"),
            ("TASKFLOW__SERVER__LOG_FORMAT", "json"),
            ("TASKFLOW__RATE_LIMIT__FAILURE_POLICY", "fail_closed"),
            ("TASKFLOW__RATE_LIMIT__STRATEGY", "atomic_counter"),
            ("TASKFLOW__RATE_LIMIT__POLICIES__LOGIN__LIMIT", "3"),
            ("TASKFLOW__RATE_LIMIT__POLICIES__LOGIN__WINDOW_MS", "1000"),
            ("TASKFLOW__JOBS__WORKER_ENABLED", "false"),
        ])
        .unwrap();

        assert_eq!(config.server.port, 8081);
        assert_eq!(config.server.log_format, LogFormat::Json);
        assert_eq!(config.rate_limit.failure_policy, FailurePolicy::FailClosed);
        assert_eq!(config.rate_limit.strategy, RateLimitStrategy::AtomicCounter);
        assert!(!config.jobs.worker_enabled);

        let login = config
            .rate_limit
            .policy_table()
            .get(operations::LOGIN)
            .copied()
            .unwrap();
        assert_eq!(login.limit, 3);
        assert_eq!(login.window_ms, 1000);
    }

    #[test]
    fn test_production_rejects_dev_secrets() {
        let _guard = ENV_MUTEX.lock().unwrap();
        let config = load_with(&[("TASKFLOW__SERVER__ENVIRONMENT", "production")]).unwrap();

        assert!(config.is_production());
        assert!(matches!(
            config.validate(),
            Err(ValidationError::WeakJwtSecret(_))
        ));
    }

    #[test]
    fn test_missing_database_url_fails_to_load() {
        let _guard = ENV_MUTEX.lock().unwrap();
        env::set_var("TASKFLOW__REDIS__URL", "redis://localhost:6379");
        let result = AppConfig::load();
        clear_env();

        assert!(result.is_err());
    }
}

//! Authentication configuration

use secrecy::{ExposeSecret, Secret};
use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;
use super::server::Environment;
use crate::adapters::auth::JwtSettings;

/// Signing secrets shipped for local development only.
pub const DEV_ACCESS_SECRET: &str = "taskflow-dev-access-secret-change-me";
pub const DEV_REFRESH_SECRET: &str = "taskflow-dev-refresh-secret-change-me";

const MIN_SECRET_BYTES: usize = 32;

/// JWT signing configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    /// HMAC secret for access tokens
    #[serde(default = "default_access_secret")]
    pub jwt_access_secret: Secret<String>,

    /// HMAC secret for refresh tokens
    #[serde(default = "default_refresh_secret")]
    pub jwt_refresh_secret: Secret<String>,

    #[serde(default = "default_access_ttl")]
    pub access_token_ttl_secs: u64,

    #[serde(default = "default_refresh_ttl")]
    pub refresh_token_ttl_secs: u64,

    /// `iss` claim written and required on every token
    #[serde(default = "default_issuer")]
    pub issuer: String,
}

impl AuthConfig {
    pub fn access_token_ttl(&self) -> Duration {
        Duration::from_secs(self.access_token_ttl_secs)
    }

    pub fn refresh_token_ttl(&self) -> Duration {
        Duration::from_secs(self.refresh_token_ttl_secs)
    }

    /// Settings for the token issuer adapter.
    pub fn jwt_settings(&self) -> JwtSettings {
        JwtSettings {
            access_secret: self.jwt_access_secret.clone(),
            refresh_secret: self.jwt_refresh_secret.clone(),
            access_ttl: self.access_token_ttl(),
            refresh_ttl: self.refresh_token_ttl(),
            issuer: self.issuer.clone(),
        }
    }

    /// Validate authentication configuration
    ///
    /// In production, both secrets must be at least 32 bytes and must not be
    /// the development defaults.
    pub fn validate(&self, environment: &Environment) -> Result<(), ValidationError> {
        let access = self.jwt_access_secret.expose_secret();
        let refresh = self.jwt_refresh_secret.expose_secret();

        if access.is_empty() {
            return Err(ValidationError::MissingRequired("AUTH__JWT_ACCESS_SECRET"));
        }
        if refresh.is_empty() {
            return Err(ValidationError::MissingRequired("AUTH__JWT_REFRESH_SECRET"));
        }
        if access == refresh {
            return Err(ValidationError::SharedJwtSecret);
        }
        if self.issuer.is_empty() {
            return Err(ValidationError::MissingRequired("AUTH__ISSUER"));
        }
        if self.access_token_ttl_secs == 0
            || self.refresh_token_ttl_secs <= self.access_token_ttl_secs
        {
            return Err(ValidationError::InvalidTokenTtl);
        }

        if *environment == Environment::Production {
            if access.len() < MIN_SECRET_BYTES || access == DEV_ACCESS_SECRET {
                return Err(ValidationError::WeakJwtSecret("access"));
            }
            if refresh.len() < MIN_SECRET_BYTES || refresh == DEV_REFRESH_SECRET {
                return Err(ValidationError::WeakJwtSecret("refresh"));
            }
        }

        Ok(())
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_access_secret: default_access_secret(),
            jwt_refresh_secret: default_refresh_secret(),
            access_token_ttl_secs: default_access_ttl(),
            refresh_token_ttl_secs: default_refresh_ttl(),
            issuer: default_issuer(),
        }
    }
}

fn default_access_secret() -> Secret<String> {
    Secret::new(DEV_ACCESS_SECRET.to_string())
}

fn default_refresh_secret() -> Secret<String> {
    Secret::new(DEV_REFRESH_SECRET.to_string())
}

fn default_access_ttl() -> u64 {
    15 * 60
}

fn default_refresh_ttl() -> u64 {
    7 * 24 * 60 * 60
}

fn default_issuer() -> String {
    "taskflow".to_string()
}

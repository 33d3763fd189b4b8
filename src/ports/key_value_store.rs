//! Key-value store port with TTL expiry.
//!
//! Backs the rate limiter's window records and general-purpose JSON caching.
//! Each call is atomic for its key; nothing spans multiple calls.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Port for a remote key-value store with per-key expiry.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Read a value. Absent and expired keys return `None`.
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Write a value that expires after `ttl_secs` seconds (at least 1).
    async fn set(&self, key: &str, value: &str, ttl_secs: u64) -> Result<(), StoreError>;

    /// Remove a key. Returns true if it existed.
    async fn delete(&self, key: &str) -> Result<bool, StoreError>;

    async fn exists(&self, key: &str) -> Result<bool, StoreError>;
}

/// Errors from the key-value store.
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum StoreError {
    /// The store could not be reached.
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// The store answered with an error.
    #[error("store operation failed: {0}")]
    Operation(String),

    #[error("serialization failed: {0}")]
    Serialization(String),
}

/// Reads and decodes a JSON value.
///
/// A value that no longer decodes as `T` is treated as absent.
pub async fn get_json<T: DeserializeOwned>(
    store: &dyn KeyValueStore,
    key: &str,
) -> Result<Option<T>, StoreError> {
    let raw = store.get(key).await?;
    Ok(raw.and_then(|value| serde_json::from_str(&value).ok()))
}

/// Encodes and writes a JSON value with a TTL.
pub async fn set_json<T: Serialize + Sync>(
    store: &dyn KeyValueStore,
    key: &str,
    value: &T,
    ttl_secs: u64,
) -> Result<(), StoreError> {
    let raw =
        serde_json::to_string(value).map_err(|e| StoreError::Serialization(e.to_string()))?;
    store.set(key, &raw, ttl_secs).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_value_store_is_object_safe() {
        fn _accepts_dyn(_store: &dyn KeyValueStore) {}
    }

    #[test]
    fn store_errors_display_context() {
        let err = StoreError::Unavailable("connection refused".to_string());
        assert_eq!(err.to_string(), "store unavailable: connection refused");
    }
}

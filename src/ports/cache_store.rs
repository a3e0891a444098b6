//! Read-through cache port.
//!
//! `get_or_load` wraps a lookup with a cache: hit returns the cached value,
//! miss runs the loader and stores a found value for `ttl`. Absent results
//! are never cached, and a failing cache only degrades to the loader.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::future::Future;
use std::time::Duration;

use crate::domain::foundation::DomainError;

/// Port for a string key/value cache with expiry.
#[async_trait]
pub trait CacheStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, DomainError>;

    async fn set(&self, key: &str, value: &str, ttl: Duration) -> Result<(), DomainError>;
}

/// Look `key` up in `cache`, falling back to `loader` on a miss.
///
/// Only `Some` results are cached. Cache read/write failures and
/// undecodable entries are logged and treated as misses.
pub async fn get_or_load<T, F, Fut>(
    cache: &dyn CacheStore,
    key: &str,
    ttl: Duration,
    loader: F,
) -> Result<Option<T>, DomainError>
where
    T: Serialize + DeserializeOwned,
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<Option<T>, DomainError>>,
{
    match cache.get(key).await {
        Ok(Some(raw)) => match serde_json::from_str::<T>(&raw) {
            Ok(value) => return Ok(Some(value)),
            Err(e) => tracing::warn!(key, error = %e, "Discarding undecodable cache entry"),
        },
        Ok(None) => {}
        Err(e) => tracing::warn!(key, error = %e, "Cache read failed, loading from source"),
    }

    let loaded = loader().await?;

    if let Some(value) = &loaded {
        match serde_json::to_string(value) {
            Ok(raw) => {
                if let Err(e) = cache.set(key, &raw, ttl).await {
                    tracing::warn!(key, error = %e, "Cache write failed");
                }
            }
            Err(e) => tracing::warn!(key, error = %e, "Failed to encode cache entry"),
        }
    }

    Ok(loaded)
}

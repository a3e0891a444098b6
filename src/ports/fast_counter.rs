//! Fast counter port for low-latency tallies.
//!
//! Counters are a cache, never the source of truth. Implementations report
//! every failure as an error; deciding what to do about a missing or
//! unreachable counter is left to the caller.

use async_trait::async_trait;

/// Port for atomic, expiring counters.
#[async_trait]
pub trait FastCounter: Send + Sync {
    /// Increment `key` by one and return the new value.
    ///
    /// When the increment creates the key (new value is 1) the expiry is set
    /// to `ttl_secs` in the same atomic step.
    async fn increment_with_expiry(&self, key: &str, ttl_secs: u64) -> Result<i64, CounterError>;

    /// Snapshot read of several keys. Absent keys come back as `None`, in
    /// the same order as `keys`.
    async fn multi_get(&self, keys: &[String]) -> Result<Vec<Option<i64>>, CounterError>;

    /// Remove the keys. Missing keys are not an error.
    async fn delete(&self, keys: &[String]) -> Result<(), CounterError>;
}

/// Errors that can occur during counter operations.
#[derive(Debug, thiserror::Error)]
pub enum CounterError {
    /// Counter backend is unavailable.
    #[error("counter unavailable: {0}")]
    Unavailable(String),

    /// A stored value could not be read as an integer.
    #[error("invalid counter value at '{key}': {value}")]
    InvalidValue { key: String, value: String },
}

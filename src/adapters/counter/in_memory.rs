//! In-memory fast counter for testing and single-server deployments.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;

use crate::ports::{CounterError, FastCounter};

#[derive(Debug, Clone)]
struct Entry {
    value: i64,
    expires_at: Instant,
}

/// In-memory counter with per-key expiry.
///
/// `set_available(false)` makes every operation fail, which lets tests
/// simulate an unreachable cache.
#[derive(Debug, Clone, Default)]
pub struct InMemoryFastCounter {
    entries: Arc<RwLock<HashMap<String, Entry>>>,
    unavailable: Arc<AtomicBool>,
}

impl InMemoryFastCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Toggle simulated backend availability.
    pub fn set_available(&self, available: bool) {
        self.unavailable.store(!available, Ordering::SeqCst);
    }

    /// Current value of a key, ignoring availability (for test assertions).
    pub async fn peek(&self, key: &str) -> Option<i64> {
        let now = Instant::now();
        self.entries
            .read()
            .await
            .get(key)
            .filter(|e| e.expires_at > now)
            .map(|e| e.value)
    }

    fn check_available(&self) -> Result<(), CounterError> {
        if self.unavailable.load(Ordering::SeqCst) {
            Err(CounterError::Unavailable(
                "in-memory counter marked unavailable".to_string(),
            ))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl FastCounter for InMemoryFastCounter {
    async fn increment_with_expiry(&self, key: &str, ttl_secs: u64) -> Result<i64, CounterError> {
        self.check_available()?;
        let now = Instant::now();

        let mut entries = self.entries.write().await;
        let entry = entries
            .entry(key.to_string())
            .and_modify(|e| {
                if e.expires_at <= now {
                    e.value = 0;
                }
            })
            .or_insert(Entry {
                value: 0,
                expires_at: now,
            });

        entry.value += 1;
        if entry.value == 1 {
            entry.expires_at = now + Duration::from_secs(ttl_secs);
        }
        Ok(entry.value)
    }

    async fn multi_get(&self, keys: &[String]) -> Result<Vec<Option<i64>>, CounterError> {
        self.check_available()?;
        let now = Instant::now();

        let entries = self.entries.read().await;
        Ok(keys
            .iter()
            .map(|k| {
                entries
                    .get(k)
                    .filter(|e| e.expires_at > now)
                    .map(|e| e.value)
            })
            .collect())
    }

    async fn delete(&self, keys: &[String]) -> Result<(), CounterError> {
        self.check_available()?;

        let mut entries = self.entries.write().await;
        for key in keys {
            entries.remove(key);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TTL: u64 = 48 * 3600;

    #[tokio::test]
    async fn increments_are_counted() {
        let counter = InMemoryFastCounter::new();

        assert_eq!(counter.increment_with_expiry("k", TTL).await.unwrap(), 1);
        assert_eq!(counter.increment_with_expiry("k", TTL).await.unwrap(), 2);
        assert_eq!(counter.peek("k").await, Some(2));
    }

    #[tokio::test]
    async fn multi_get_reports_absent_keys() {
        let counter = InMemoryFastCounter::new();
        counter.increment_with_expiry("yes", TTL).await.unwrap();

        let values = counter
            .multi_get(&["yes".to_string(), "no".to_string()])
            .await
            .unwrap();

        assert_eq!(values, vec![Some(1), None]);
    }

    #[tokio::test]
    async fn expired_keys_restart_from_one() {
        let counter = InMemoryFastCounter::new();
        counter.increment_with_expiry("k", 0).await.unwrap();

        assert_eq!(counter.peek("k").await, None);
        assert_eq!(counter.increment_with_expiry("k", TTL).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn delete_removes_keys() {
        let counter = InMemoryFastCounter::new();
        counter.increment_with_expiry("k", TTL).await.unwrap();

        counter.delete(&["k".to_string(), "missing".to_string()]).await.unwrap();

        assert_eq!(counter.peek("k").await, None);
    }

    #[tokio::test]
    async fn unavailable_counter_errors_instead_of_zero() {
        let counter = InMemoryFastCounter::new();
        counter.increment_with_expiry("k", TTL).await.unwrap();
        counter.set_available(false);

        assert!(matches!(
            counter.multi_get(&["k".to_string()]).await,
            Err(CounterError::Unavailable(_))
        ));
        assert!(counter.increment_with_expiry("k", TTL).await.is_err());
        assert!(counter.delete(&["k".to_string()]).await.is_err());

        counter.set_available(true);
        assert_eq!(counter.peek("k").await, Some(1));
    }

    #[tokio::test]
    async fn concurrent_increments_are_not_lost() {
        let counter = InMemoryFastCounter::new();

        let tasks: Vec<_> = (0..50)
            .map(|_| {
                let c = counter.clone();
                tokio::spawn(async move { c.increment_with_expiry("k", TTL).await })
            })
            .collect();
        for task in tasks {
            task.await.unwrap().unwrap();
        }

        assert_eq!(counter.peek("k").await, Some(50));
    }
}

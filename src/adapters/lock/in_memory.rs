//! In-memory distributed lock.
//!
//! Only exclusive between clones of the same value, which is enough for
//! tests that simulate several sweeper instances in one process.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::ports::{DistributedLock, LockError, LockLease, LockRequest};

#[derive(Debug, Clone)]
struct Held {
    token: String,
    expires_at: Instant,
}

#[derive(Debug, Clone, Default)]
pub struct InMemoryDistributedLock {
    held: Arc<Mutex<HashMap<String, Held>>>,
}

impl InMemoryDistributedLock {
    pub fn new() -> Self {
        Self::default()
    }

    /// True if `name` is currently held (for test assertions).
    pub async fn is_held(&self, name: &str) -> bool {
        let now = Instant::now();
        self.held
            .lock()
            .await
            .get(name)
            .map(|h| h.expires_at > now)
            .unwrap_or(false)
    }
}

#[async_trait]
impl DistributedLock for InMemoryDistributedLock {
    async fn try_acquire(&self, request: &LockRequest) -> Result<Option<LockLease>, LockError> {
        let now = Instant::now();
        let mut held = self.held.lock().await;

        if let Some(current) = held.get(&request.name) {
            if current.expires_at > now {
                return Ok(None);
            }
        }

        let token = Uuid::new_v4().to_string();
        held.insert(
            request.name.clone(),
            Held {
                token: token.clone(),
                expires_at: now + request.max_hold,
            },
        );

        Ok(Some(LockLease {
            name: request.name.clone(),
            token,
            acquired_at: now,
            min_hold: request.min_hold,
        }))
    }

    async fn release(&self, lease: LockLease) -> Result<(), LockError> {
        let now = Instant::now();
        let mut held = self.held.lock().await;

        let owned = held
            .get(&lease.name)
            .map(|h| h.token == lease.token)
            .unwrap_or(false);
        if !owned {
            return Ok(());
        }

        let remaining = lease.remaining_min_hold(now);
        if remaining.is_zero() {
            held.remove(&lease.name);
        } else if let Some(entry) = held.get_mut(&lease.name) {
            entry.expires_at = now + remaining;
        }
        Ok(())
    }
}

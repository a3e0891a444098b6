//! Distributed lock port.
//!
//! A named lease shared by every running instance. Holding it grants the
//! right to run one scheduled job; the lease is bounded on both sides:
//!
//! - `min_hold`: once acquired the lock is held at least this long, even if
//!   released earlier, so a job that finishes instantly cannot be re-run
//!   immediately by another instance.
//! - `max_hold`: the lease expires on its own after this long, so a crashed
//!   or hung holder never blocks the job forever.

use async_trait::async_trait;
use std::time::{Duration, Instant};

/// What to lock and for how long.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LockRequest {
    pub name: String,
    pub min_hold: Duration,
    pub max_hold: Duration,
}

impl LockRequest {
    pub fn new(name: impl Into<String>, min_hold: Duration, max_hold: Duration) -> Self {
        Self {
            name: name.into(),
            min_hold,
            max_hold,
        }
    }
}

/// Proof of ownership returned by a successful acquire.
#[derive(Debug, Clone)]
pub struct LockLease {
    pub name: String,
    /// Unique per acquisition; release only affects the lease holding it.
    pub token: String,
    pub acquired_at: Instant,
    pub min_hold: Duration,
}

impl LockLease {
    /// Portion of the minimum hold still left at `now`.
    pub fn remaining_min_hold(&self, now: Instant) -> Duration {
        self.min_hold
            .saturating_sub(now.saturating_duration_since(self.acquired_at))
    }
}

/// Port for cross-instance mutual exclusion.
#[async_trait]
pub trait DistributedLock: Send + Sync {
    /// Try to take the lock without waiting.
    ///
    /// Returns `None` when another holder owns it.
    async fn try_acquire(&self, request: &LockRequest) -> Result<Option<LockLease>, LockError>;

    /// Give the lease back. The lock stays held until `min_hold` has
    /// elapsed since acquisition.
    async fn release(&self, lease: LockLease) -> Result<(), LockError>;
}

/// Errors that can occur during lock operations.
#[derive(Debug, thiserror::Error)]
pub enum LockError {
    /// Lock backend is unavailable.
    #[error("lock backend unavailable: {0}")]
    Unavailable(String),
}

//! ExpirationSweeper - Background job that closes expired sessions.
//!
//! Every instance runs the loop; the distributed lock makes sure only one
//! of them sweeps per tick.
//!
//! ## Configuration
//!
//! | Setting | Default | Description |
//! |---------|---------|-------------|
//! | `interval` | 9s | Delay between sweeps |
//! | `lock_name` | `close-expired-sessions` | Lease shared by all instances |
//! | `lock_min_hold` | 2s | Lease is kept at least this long |
//! | `lock_max_hold` | 2m | Lease expires on its own after this |
//!
//! ## Graceful Shutdown
//!
//! The loop listens for a shutdown signal and exits between sweeps. A
//! sweep in progress is finished first.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::time::{self, MissedTickBehavior};

use crate::domain::foundation::Timestamp;
use crate::domain::voting::VotingError;
use crate::ports::{DistributedLock, LockRequest, VotingSessionRepository};

use super::SessionCloser;

/// Lease name shared by every sweeper instance.
pub const SWEEP_LOCK_NAME: &str = "close-expired-sessions";

/// Configuration for the ExpirationSweeper.
#[derive(Debug, Clone)]
pub struct ExpirationSweeperConfig {
    /// Delay between sweeps.
    pub interval: Duration,

    pub lock_name: String,

    /// Minimum time the lease is held, even if the sweep ends sooner.
    pub lock_min_hold: Duration,

    /// Maximum time the lease is held before it expires by itself.
    pub lock_max_hold: Duration,
}

impl Default for ExpirationSweeperConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(9),
            lock_name: SWEEP_LOCK_NAME.to_string(),
            lock_min_hold: Duration::from_secs(2),
            lock_max_hold: Duration::from_secs(120),
        }
    }
}

impl ExpirationSweeperConfig {
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    pub fn with_lock_name(mut self, name: impl Into<String>) -> Self {
        self.lock_name = name.into();
        self
    }

    pub fn with_lock_hold(mut self, min_hold: Duration, max_hold: Duration) -> Self {
        self.lock_min_hold = min_hold;
        self.lock_max_hold = max_hold;
        self
    }

    fn lock_request(&self) -> LockRequest {
        LockRequest::new(&self.lock_name, self.lock_min_hold, self.lock_max_hold)
    }
}

/// What a single sweep did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SweepReport {
    /// False when another instance held the lock (or the lock was unreachable).
    pub lock_acquired: bool,
    /// Expired OPEN sessions found.
    pub expired: usize,
    /// Sessions closed and announced.
    pub closed: usize,
    /// Sessions closed whose announcement failed.
    pub publish_failures: usize,
    /// Sessions left OPEN because closing them failed.
    pub failed: usize,
}

/// Background service that closes expired voting sessions.
pub struct ExpirationSweeper {
    sessions: Arc<dyn VotingSessionRepository>,
    lock: Arc<dyn DistributedLock>,
    closer: Arc<SessionCloser>,
    config: ExpirationSweeperConfig,
}

impl ExpirationSweeper {
    pub fn new(
        sessions: Arc<dyn VotingSessionRepository>,
        lock: Arc<dyn DistributedLock>,
        closer: Arc<SessionCloser>,
    ) -> Self {
        Self::with_config(sessions, lock, closer, ExpirationSweeperConfig::default())
    }

    pub fn with_config(
        sessions: Arc<dyn VotingSessionRepository>,
        lock: Arc<dyn DistributedLock>,
        closer: Arc<SessionCloser>,
        config: ExpirationSweeperConfig,
    ) -> Self {
        Self {
            sessions,
            lock,
            closer,
            config,
        }
    }

    /// Run the sweep loop until the shutdown signal is received.
    ///
    /// The next sweep is scheduled `interval` after the previous one
    /// finished, never overlapping it.
    pub async fn run(&self, mut shutdown: watch::Receiver<bool>) {
        let mut interval = time::interval(self.config.interval);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        tracing::info!(
            interval_ms = self.config.interval.as_millis() as u64,
            lock = %self.config.lock_name,
            "Expiration sweeper started"
        );

        loop {
            tokio::select! {
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        tracing::info!("Expiration sweeper stopped");
                        return;
                    }
                }

                _ = interval.tick() => {
                    self.run_once().await;
                }
            }
        }
    }

    /// Run exactly one sweep.
    pub async fn run_once(&self) -> SweepReport {
        let mut report = SweepReport::default();

        let lease = match self.lock.try_acquire(&self.config.lock_request()).await {
            Ok(Some(lease)) => lease,
            Ok(None) => {
                tracing::debug!(
                    lock = %self.config.lock_name,
                    "Sweep skipped, lock held elsewhere"
                );
                return report;
            }
            Err(e) => {
                tracing::warn!(
                    lock = %self.config.lock_name,
                    error = %e,
                    "Sweep skipped, lock unavailable"
                );
                return report;
            }
        };
        report.lock_acquired = true;

        self.sweep(&mut report).await;

        if let Err(e) = self.lock.release(lease).await {
            tracing::warn!(
                lock = %self.config.lock_name,
                error = %e,
                "Failed to release sweep lock"
            );
        }

        if report.expired > 0 {
            tracing::info!(
                expired = report.expired,
                closed = report.closed,
                publish_failures = report.publish_failures,
                failed = report.failed,
                "Sweep finished"
            );
        }
        report
    }

    async fn sweep(&self, report: &mut SweepReport) {
        let expired = match self.sessions.find_expired_open(Timestamp::now()).await {
            Ok(expired) => expired,
            Err(e) => {
                tracing::error!(error = %e, "Failed to list expired sessions");
                return;
            }
        };
        report.expired = expired.len();

        for session in expired {
            let session_id = session.id();
            match self.closer.close(session).await {
                Ok(_) => report.closed += 1,
                Err(VotingError::PublishFailed { .. }) => report.publish_failures += 1,
                Err(e) => {
                    report.failed += 1;
                    tracing::error!(
                        session_id = %session_id,
                        error = %e,
                        "Failed to close session"
                    );
                }
            }
        }
    }
}

//! Voting lifecycle configuration
//!
//! Every value has a default, so the section can be omitted entirely.

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;
use crate::domain::voting::MAX_SESSION_DURATION_SECS;

/// Session, counter, sweeper and publish settings.
#[derive(Debug, Clone, Deserialize)]
pub struct VotingConfig {
    /// Window length when the request gives none (or a non-positive one)
    #[serde(default = "default_session_duration")]
    pub default_session_duration_secs: i64,

    /// Expiry of the per-session fast counters
    #[serde(default = "default_counter_ttl")]
    pub counter_ttl_secs: u64,

    /// Delay between expiration sweeps
    #[serde(default = "default_sweep_interval")]
    pub sweep_interval_secs: u64,

    /// Name of the lease shared by all sweeper instances
    #[serde(default = "default_lock_name")]
    pub sweep_lock_name: String,

    #[serde(default = "default_lock_min_hold")]
    pub lock_min_hold_secs: u64,

    #[serde(default = "default_lock_max_hold")]
    pub lock_max_hold_secs: u64,

    /// Bound on one result publish
    #[serde(default = "default_publish_timeout")]
    pub publish_timeout_secs: u64,
}

impl VotingConfig {
    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_secs)
    }

    pub fn lock_min_hold(&self) -> Duration {
        Duration::from_secs(self.lock_min_hold_secs)
    }

    pub fn lock_max_hold(&self) -> Duration {
        Duration::from_secs(self.lock_max_hold_secs)
    }

    pub fn publish_timeout(&self) -> Duration {
        Duration::from_secs(self.publish_timeout_secs)
    }

    /// Validate voting configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.default_session_duration_secs <= 0 {
            return Err(ValidationError::MustBePositive(
                "voting.default_session_duration_secs",
            ));
        }
        if self.default_session_duration_secs > MAX_SESSION_DURATION_SECS {
            return Err(ValidationError::SessionDurationTooLong {
                max: MAX_SESSION_DURATION_SECS,
            });
        }
        if self.counter_ttl_secs == 0 {
            return Err(ValidationError::MustBePositive("voting.counter_ttl_secs"));
        }
        if self.sweep_interval_secs == 0 {
            return Err(ValidationError::MustBePositive("voting.sweep_interval_secs"));
        }
        if self.sweep_lock_name.trim().is_empty() {
            return Err(ValidationError::MissingRequired("VOTING__SWEEP_LOCK_NAME"));
        }
        if self.lock_max_hold_secs == 0 {
            return Err(ValidationError::MustBePositive("voting.lock_max_hold_secs"));
        }
        if self.lock_min_hold_secs > self.lock_max_hold_secs {
            return Err(ValidationError::InvalidLockHold);
        }
        if self.publish_timeout_secs == 0 {
            return Err(ValidationError::MustBePositive("voting.publish_timeout_secs"));
        }
        Ok(())
    }
}

impl Default for VotingConfig {
    fn default() -> Self {
        Self {
            default_session_duration_secs: default_session_duration(),
            counter_ttl_secs: default_counter_ttl(),
            sweep_interval_secs: default_sweep_interval(),
            sweep_lock_name: default_lock_name(),
            lock_min_hold_secs: default_lock_min_hold(),
            lock_max_hold_secs: default_lock_max_hold(),
            publish_timeout_secs: default_publish_timeout(),
        }
    }
}

fn default_session_duration() -> i64 {
    60
}

fn default_counter_ttl() -> u64 {
    48 * 60 * 60
}

fn default_sweep_interval() -> u64 {
    9
}

fn default_lock_name() -> String {
    "close-expired-sessions".to_string()
}

fn default_lock_min_hold() -> u64 {
    2
}

fn default_lock_max_hold() -> u64 {
    120
}

fn default_publish_timeout() -> u64 {
    30
}

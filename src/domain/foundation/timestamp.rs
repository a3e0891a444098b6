//! UTC instants used for session windows, ballots and audit columns.

use chrono::{DateTime, Duration, DurationRound, Utc};
use serde::{Deserialize, Serialize};

/// A point in time in UTC. Ordering is chronological, so window checks
/// are plain comparisons (`now >= ends_at`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    pub fn now() -> Self {
        Self(Utc::now())
    }

    pub fn from_datetime(dt: DateTime<Utc>) -> Self {
        Self(dt)
    }

    pub fn as_datetime(&self) -> &DateTime<Utc> {
        &self.0
    }

    /// Drops the sub-second part, so window boundaries land on whole seconds.
    pub fn truncate_to_secs(&self) -> Self {
        self.0
            .duration_trunc(Duration::seconds(1))
            .map(Self)
            .unwrap_or(*self)
    }

    /// Out-of-range values clamp to the Unix epoch.
    pub fn from_unix_secs(secs: i64) -> Self {
        Self(DateTime::from_timestamp(secs, 0).unwrap_or_default())
    }

    pub fn as_unix_secs(&self) -> i64 {
        self.0.timestamp()
    }

    /// `None` when the result falls outside the representable range.
    pub fn checked_plus_secs(&self, secs: i64) -> Option<Self> {
        Duration::try_seconds(secs)
            .and_then(|delta| self.0.checked_add_signed(delta))
            .map(Self)
    }

    /// Saturates at the representable bounds instead of overflowing.
    pub fn plus_secs(&self, secs: i64) -> Self {
        self.checked_plus_secs(secs).unwrap_or(if secs < 0 {
            Self(DateTime::<Utc>::MIN_UTC)
        } else {
            Self(DateTime::<Utc>::MAX_UTC)
        })
    }

    pub fn minus_secs(&self, secs: i64) -> Self {
        self.plus_secs(secs.saturating_neg())
    }
}

impl Default for Timestamp {
    fn default() -> Self {
        Self::now()
    }
}

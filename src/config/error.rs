//! Configuration errors.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    /// A variable is missing or cannot be parsed into its field.
    #[error("Failed to read configuration: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Invalid configuration: {0}")]
    ValidationFailed(#[from] ValidationError),
}

/// A loaded value the service cannot start with.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{0} is required")]
    MissingRequired(&'static str),

    #[error("server.port must be non-zero")]
    InvalidPort,

    #[error("server.request_timeout_secs is out of range")]
    InvalidTimeout,

    #[error("Cannot bind to '{0}'")]
    InvalidSocketAddr(String),

    #[error("database.url must be a postgres:// URL")]
    InvalidDatabaseUrl,

    #[error("redis.url must be a redis:// or rediss:// URL")]
    InvalidRedisUrl,

    #[error("database.min_connections is larger than database.max_connections")]
    InvalidPoolSize,

    #[error("database.max_connections is above the pool ceiling")]
    PoolSizeTooLarge,

    #[error("{0} must be greater than zero")]
    MustBePositive(&'static str),

    #[error("voting.default_session_duration_secs must be at most {max}")]
    SessionDurationTooLong { max: i64 },

    #[error("voting.lock_min_hold_secs is larger than voting.lock_max_hold_secs")]
    InvalidLockHold,

    #[error("events.partitions must be between 1 and {max}")]
    InvalidPartitionCount { max: u32 },
}

//! Service configuration, read from `COOP_VOTING__*` environment variables.
//!
//! A `.env` file is honoured in development. Nesting uses `__`, so
//! `COOP_VOTING__VOTING__SWEEP_INTERVAL_SECS=5` sets
//! `voting.sweep_interval_secs`.
//!
//! ```no_run
//! use coop_voting::config::AppConfig;
//!
//! let config = AppConfig::load().expect("configuration");
//! config.validate().expect("valid configuration");
//! ```

mod cache;
mod database;
mod error;
mod events;
mod redis;
mod server;
mod voting;

pub use cache::CacheConfig;
pub use database::DatabaseConfig;
pub use error::{ConfigError, ValidationError};
pub use events::EventsConfig;
pub use self::redis::RedisConfig;
pub use server::{Environment, ServerConfig};
pub use voting::VotingConfig;

use serde::Deserialize;

pub const ENV_PREFIX: &str = "COOP_VOTING";

/// Everything the server needs at startup.
///
/// Only `database.url` and `redis.url` have no default.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,

    pub database: DatabaseConfig,

    pub redis: RedisConfig,

    /// Session lifecycle, sweeper and publish settings.
    #[serde(default)]
    pub voting: VotingConfig,

    #[serde(default)]
    pub cache: CacheConfig,

    /// Result stream naming and partitioning.
    #[serde(default)]
    pub events: EventsConfig,
}

impl AppConfig {
    /// Read `.env` (if any) and the process environment.
    ///
    /// # Errors
    ///
    /// `LoadError` when a required variable is missing or a value does not
    /// parse into its field's type.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let source = config::Environment::default()
            .prefix(ENV_PREFIX)
            .separator("__");
        let config = config::Config::builder()
            .add_source(source)
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Check every section, stopping at the first problem.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.server.validate()?;
        self.database.validate()?;
        self.redis.validate()?;
        self.voting.validate()?;
        self.cache.validate()?;
        self.events.validate()
    }

    pub fn is_production(&self) -> bool {
        self.server.is_production()
    }
}

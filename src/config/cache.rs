//! Read-through cache configuration

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

/// TTLs for `get_or_load` entries.
#[derive(Debug, Clone, Deserialize)]
pub struct CacheConfig {
    /// Agenda item lookups
    #[serde(default = "default_agenda_item_ttl")]
    pub agenda_item_ttl_secs: u64,

    /// Voter eligibility answers. Eligibility checks are not wired into
    /// vote admission yet; the value is kept so deployments can set it.
    #[serde(default = "default_voter_eligibility_ttl")]
    pub voter_eligibility_ttl_secs: u64,
}

impl CacheConfig {
    pub fn agenda_item_ttl(&self) -> Duration {
        Duration::from_secs(self.agenda_item_ttl_secs)
    }

    pub fn voter_eligibility_ttl(&self) -> Duration {
        Duration::from_secs(self.voter_eligibility_ttl_secs)
    }

    /// Validate cache configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.agenda_item_ttl_secs == 0 {
            return Err(ValidationError::MustBePositive("cache.agenda_item_ttl_secs"));
        }
        if self.voter_eligibility_ttl_secs == 0 {
            return Err(ValidationError::MustBePositive(
                "cache.voter_eligibility_ttl_secs",
            ));
        }
        Ok(())
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            agenda_item_ttl_secs: default_agenda_item_ttl(),
            voter_eligibility_ttl_secs: default_voter_eligibility_ttl(),
        }
    }
}

fn default_agenda_item_ttl() -> u64 {
    30 * 60
}

fn default_voter_eligibility_ttl() -> u64 {
    60 * 60
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_config_defaults() {
        let config = CacheConfig::default();
        assert_eq!(config.agenda_item_ttl(), Duration::from_secs(1800));
        assert_eq!(config.voter_eligibility_ttl(), Duration::from_secs(3600));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validation_zero_ttl() {
        let config = CacheConfig {
            agenda_item_ttl_secs: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}

//! Result event stream configuration

use serde::Deserialize;

use super::error::ValidationError;

const MAX_PARTITIONS: u32 = 256;

/// Where result announcements are published.
#[derive(Debug, Clone, Deserialize)]
pub struct EventsConfig {
    /// Base stream name; partitions are `<stream>:<n>`
    #[serde(default = "default_result_stream")]
    pub result_stream: String,

    #[serde(default = "default_partitions")]
    pub partitions: u32,
}

impl EventsConfig {
    /// Validate events configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.result_stream.trim().is_empty() {
            return Err(ValidationError::MissingRequired("EVENTS__RESULT_STREAM"));
        }
        if self.partitions == 0 || self.partitions > MAX_PARTITIONS {
            return Err(ValidationError::InvalidPartitionCount {
                max: MAX_PARTITIONS,
            });
        }
        Ok(())
    }
}

impl Default for EventsConfig {
    fn default() -> Self {
        Self {
            result_stream: default_result_stream(),
            partitions: default_partitions(),
        }
    }
}

fn default_result_stream() -> String {
    "voting-results".to_string()
}

fn default_partitions() -> u32 {
    3
}

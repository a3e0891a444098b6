//! Outbound port for announcing closed-session results.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, EventEnvelope};

/// Sends an event to the message bus.
///
/// Result announcements are keyed by agenda item id, so every result for
/// one item lands on the same partition in close order. A failed send is
/// reported to the caller; nothing here retries.
#[async_trait]
pub trait EventPublisher: Send + Sync {
    async fn publish(&self, event: EventEnvelope, partition_key: &str)
        -> Result<(), DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn publisher_can_be_shared_as_trait_object() {
        fn _accepts(_publisher: std::sync::Arc<dyn EventPublisher>) {}
    }
}

//! ResultPublisher - Announces a closed session's result.
//!
//! One attempt, bounded by a timeout. A failure is logged and returned,
//! and the caller decides what it means; the closure it announces is
//! already committed and stays that way.

use std::sync::Arc;
use std::time::Duration;

use crate::domain::foundation::DomainEvent;
use crate::domain::voting::{VotingError, VotingResultAnnounced};
use crate::ports::EventPublisher;

/// Default bound on a single publish call.
pub const DEFAULT_PUBLISH_TIMEOUT: Duration = Duration::from_secs(30);

/// Sends result events to the bus, keyed by agenda item.
pub struct ResultPublisher {
    publisher: Arc<dyn EventPublisher>,
    timeout: Duration,
}

impl ResultPublisher {
    pub fn new(publisher: Arc<dyn EventPublisher>) -> Self {
        Self {
            publisher,
            timeout: DEFAULT_PUBLISH_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Publish `event` once.
    ///
    /// # Errors
    ///
    /// `PublishFailed` on transport failure or when the timeout elapses.
    pub async fn publish(&self, event: &VotingResultAnnounced) -> Result<(), VotingError> {
        let envelope = event
            .to_envelope()?
            .with_correlation_id(event.session_id.to_string());
        let key = event.partition_key();

        let outcome =
            tokio::time::timeout(self.timeout, self.publisher.publish(envelope, &key)).await;

        let reason = match outcome {
            Ok(Ok(())) => {
                tracing::info!(
                    agenda_item_id = %event.agenda_item_id,
                    session_id = %event.session_id,
                    outcome = %event.outcome,
                    "Voting result published"
                );
                return Ok(());
            }
            Ok(Err(e)) => e.to_string(),
            Err(_) => format!("timed out after {}ms", self.timeout.as_millis()),
        };

        tracing::error!(
            agenda_item_id = %event.agenda_item_id,
            session_id = %event.session_id,
            reason = %reason,
            "Failed to publish voting result"
        );
        Err(VotingError::PublishFailed {
            agenda_item_id: event.agenda_item_id,
            reason,
        })
    }
}

//! In-process result bus for tests.
//!
//! Records every announced result with its partition key. It can also be
//! switched to fail or stall, which is how the publish timeout and the
//! "session stays closed after a failed announce" paths are exercised.
//!
//! Lock poisoning panics; use `RedisStreamEventPublisher` outside tests.

use async_trait::async_trait;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use crate::domain::foundation::{DomainError, ErrorCode, EventEnvelope};
use crate::ports::EventPublisher;

/// How the bus reacts to a publish call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PublishBehavior {
    Accept,
    /// Return a transport error without recording.
    Fail,
    /// Sleep before recording, like a slow broker.
    Delay(Duration),
}

/// A published event together with the partition key it was sent under.
#[derive(Debug, Clone)]
pub struct PublishedEvent {
    pub partition_key: String,
    pub envelope: EventEnvelope,
}

#[derive(Debug)]
struct BusState {
    behavior: PublishBehavior,
    attempts: usize,
    published: Vec<PublishedEvent>,
}

/// Clones share one log, so a test can keep a handle after passing the
/// bus into a `ResultPublisher`.
#[derive(Clone)]
pub struct InMemoryEventBus {
    state: Arc<Mutex<BusState>>,
}

impl InMemoryEventBus {
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(BusState {
                behavior: PublishBehavior::Accept,
                attempts: 0,
                published: Vec::new(),
            })),
        }
    }

    fn state(&self) -> MutexGuard<'_, BusState> {
        self.state.lock().expect("InMemoryEventBus: state lock poisoned")
    }

    pub fn set_behavior(&self, behavior: PublishBehavior) {
        self.state().behavior = behavior;
    }

    pub fn published_events(&self) -> Vec<PublishedEvent> {
        self.state().published.clone()
    }

    pub fn event_count(&self) -> usize {
        self.state().published.len()
    }

    /// Publish calls seen so far, including failed and stalled ones.
    pub fn attempt_count(&self) -> usize {
        self.state().attempts
    }
}

impl Default for InMemoryEventBus {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl EventPublisher for InMemoryEventBus {
    async fn publish(&self, event: EventEnvelope, partition_key: &str) -> Result<(), DomainError> {
        // The guard must be dropped before sleeping
        let behavior = {
            let mut state = self.state();
            state.attempts += 1;
            state.behavior
        };

        match behavior {
            PublishBehavior::Accept => {}
            PublishBehavior::Fail => {
                return Err(DomainError::new(
                    ErrorCode::EventPublishError,
                    "Simulated broker failure",
                ));
            }
            PublishBehavior::Delay(delay) => tokio::time::sleep(delay).await,
        }

        self.state().published.push(PublishedEvent {
            partition_key: partition_key.to_string(),
            envelope: event,
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn announcement(session: &str) -> EventEnvelope {
        EventEnvelope::new(
            "voting.result_announced.v1",
            "item-1",
            "AgendaItem",
            json!({ "session_id": session, "outcome": "APPROVED" }),
        )
    }

    #[tokio::test]
    async fn records_event_under_its_partition_key() {
        let bus = InMemoryEventBus::new();

        bus.publish(announcement("s-1"), "item-1").await.unwrap();

        let events = bus.published_events();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].partition_key, "item-1");
        assert_eq!(events[0].envelope.payload["session_id"], "s-1");
    }

    #[tokio::test]
    async fn failing_bus_counts_the_attempt_only() {
        let bus = InMemoryEventBus::new();
        bus.set_behavior(PublishBehavior::Fail);

        let err = bus.publish(announcement("s-1"), "item-1").await.unwrap_err();

        assert_eq!(err.code, ErrorCode::EventPublishError);
        assert_eq!(bus.event_count(), 0);
        assert_eq!(bus.attempt_count(), 1);
    }

    #[tokio::test]
    async fn stalled_bus_records_after_the_delay() {
        let bus = InMemoryEventBus::new();
        bus.set_behavior(PublishBehavior::Delay(Duration::from_millis(10)));

        bus.publish(announcement("s-1"), "item-1").await.unwrap();

        assert_eq!(bus.event_count(), 1);
    }

    #[tokio::test]
    async fn clones_see_the_same_log() {
        let bus = InMemoryEventBus::new();
        let handle = bus.clone();

        handle.publish(announcement("s-1"), "item-1").await.unwrap();
        handle.publish(announcement("s-2"), "item-1").await.unwrap();

        assert_eq!(bus.event_count(), 2);
        assert_eq!(bus.attempt_count(), 2);
    }
}

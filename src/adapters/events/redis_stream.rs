//! Redis Streams event publisher.
//!
//! Each stream `<base>:<n>` acts as one partition. The partition for a key
//! is a stable hash, so every event for one agenda item goes to the same
//! stream and keeps its relative order.

use async_trait::async_trait;
use redis::aio::MultiplexedConnection;
use redis::AsyncCommands;
use sha2::{Digest, Sha256};

use crate::domain::foundation::{DomainError, ErrorCode, EventEnvelope};
use crate::ports::EventPublisher;

/// Publishes envelopes with `XADD` onto partitioned streams.
#[derive(Clone)]
pub struct RedisStreamEventPublisher {
    conn: MultiplexedConnection,
    stream: String,
    partitions: u32,
}

impl RedisStreamEventPublisher {
    pub fn new(conn: MultiplexedConnection, stream: impl Into<String>, partitions: u32) -> Self {
        Self {
            conn,
            stream: stream.into(),
            partitions: partitions.max(1),
        }
    }

    /// Stream name for a partition key.
    pub fn stream_for(&self, partition_key: &str) -> String {
        format!(
            "{}:{}",
            self.stream,
            partition_for(partition_key, self.partitions)
        )
    }
}

/// Stable partition index in `0..partitions`.
pub fn partition_for(partition_key: &str, partitions: u32) -> u32 {
    let digest = Sha256::digest(partition_key.as_bytes());
    let mut prefix = [0u8; 8];
    prefix.copy_from_slice(&digest[..8]);
    (u64::from_be_bytes(prefix) % u64::from(partitions.max(1))) as u32
}

fn publish_error(message: String) -> DomainError {
    DomainError::new(ErrorCode::EventPublishError, message)
}

#[async_trait]
impl EventPublisher for RedisStreamEventPublisher {
    async fn publish(&self, event: EventEnvelope, partition_key: &str) -> Result<(), DomainError> {
        let stream = self.stream_for(partition_key);
        let body = serde_json::to_string(&event.payload)
            .map_err(|e| publish_error(format!("Failed to encode payload: {}", e)))?;
        let event_id = event.event_id.to_string();
        let mut conn = self.conn.clone();

        let mut fields = vec![
            ("event_id", event_id.as_str()),
            ("event_type", event.event_type.as_str()),
            ("key", partition_key),
            ("payload", body.as_str()),
        ];
        if let Some(correlation_id) = event.correlation_id.as_deref() {
            fields.push(("correlation_id", correlation_id));
        }

        let entry_id: String = conn
            .xadd(&stream, "*", &fields[..])
            .await
            .map_err(|e: redis::RedisError| {
                publish_error(format!("XADD to {} failed: {}", stream, e))
            })?;

        tracing::info!(
            stream = %stream,
            entry_id = %entry_id,
            event_type = %event.event_type,
            key = partition_key,
            "Event published"
        );
        Ok(())
    }
}

impl std::fmt::Debug for RedisStreamEventPublisher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisStreamEventPublisher")
            .field("stream", &self.stream)
            .field("partitions", &self.partitions)
            .finish_non_exhaustive()
    }
}

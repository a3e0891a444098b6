//! Event adapters.
//!
//! ## Available Adapters
//!
//! - `InMemoryEventBus` - Captures events for tests, with failure injection
//! - `RedisStreamEventPublisher` - Partitioned Redis Streams for production

mod in_memory;
mod redis_stream;

pub use in_memory::{InMemoryEventBus, PublishBehavior, PublishedEvent};
pub use redis_stream::{partition_for, RedisStreamEventPublisher};

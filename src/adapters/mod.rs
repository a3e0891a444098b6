//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `postgres` - Durable agenda items, sessions and votes
//! - `counter` - Fast per-session vote counters (in-memory, Redis)
//! - `lock` - Cluster-wide lease for the expiration sweep (in-memory, Redis)
//! - `cache` - Read-through cache for agenda items (in-memory, Redis)
//! - `events` - Result event bus (in-memory, Redis Streams)
//! - `storage` - In-memory repositories for tests and local runs
//! - `http` - REST API (axum)

pub mod cache;
pub mod counter;
pub mod events;
pub mod http;
pub mod lock;
pub mod postgres;
pub mod storage;

pub use cache::{InMemoryCacheStore, RedisCacheStore};
pub use counter::{InMemoryFastCounter, RedisFastCounter};
pub use events::{InMemoryEventBus, RedisStreamEventPublisher};
pub use lock::{InMemoryDistributedLock, RedisDistributedLock};
pub use postgres::{
    PostgresAgendaItemRepository, PostgresVoteRepository, PostgresVotingSessionRepository,
};
pub use storage::InMemoryVotingStore;

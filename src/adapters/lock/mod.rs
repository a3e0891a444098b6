//! Distributed lock adapters.
//!
//! ## Available Adapters
//!
//! - `InMemoryDistributedLock` - Process-local, for tests and single-server
//! - `RedisDistributedLock` - Redis lease shared across instances

mod in_memory;
mod redis;

pub use in_memory::InMemoryDistributedLock;
pub use self::redis::RedisDistributedLock;

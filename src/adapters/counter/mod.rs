//! Fast counter adapters.
//!
//! ## Available Adapters
//!
//! - `InMemoryFastCounter` - In-memory for testing and single-server
//! - `RedisFastCounter` - Redis-backed for production multi-server

mod in_memory;
mod redis;

pub use in_memory::InMemoryFastCounter;
pub use self::redis::RedisFastCounter;

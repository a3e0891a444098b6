//! Cache store adapters backing `get_or_load`.

mod in_memory;
mod redis;

pub use in_memory::InMemoryCacheStore;
pub use self::redis::RedisCacheStore;

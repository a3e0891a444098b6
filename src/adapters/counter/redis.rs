//! Redis-backed fast counter for multi-server deployments.
//!
//! Increment and first-time expiry run as one Lua script, so a crash
//! between the two can never leave a counter without a TTL.

use async_trait::async_trait;
use redis::aio::MultiplexedConnection;
use redis::{AsyncCommands, Script};

use crate::ports::{CounterError, FastCounter};

/// INCR, and on the first increment EXPIRE, in a single round trip.
const INCREMENT_WITH_EXPIRY_SCRIPT: &str = r#"
local current = redis.call('INCR', KEYS[1])
if current == 1 then
    redis.call('EXPIRE', KEYS[1], ARGV[1])
end
return current
"#;

/// Redis-backed counter.
#[derive(Clone)]
pub struct RedisFastCounter {
    conn: MultiplexedConnection,
    increment_script: Script,
}

impl RedisFastCounter {
    pub fn new(conn: MultiplexedConnection) -> Self {
        Self {
            conn,
            increment_script: Script::new(INCREMENT_WITH_EXPIRY_SCRIPT),
        }
    }
}

/// Parse a raw MGET reply entry.
fn parse_counter(key: &str, raw: Option<String>) -> Result<Option<i64>, CounterError> {
    match raw {
        None => Ok(None),
        Some(value) => value
            .trim()
            .parse::<i64>()
            .map(Some)
            .map_err(|_| CounterError::InvalidValue {
                key: key.to_string(),
                value,
            }),
    }
}

#[async_trait]
impl FastCounter for RedisFastCounter {
    async fn increment_with_expiry(&self, key: &str, ttl_secs: u64) -> Result<i64, CounterError> {
        let mut conn = self.conn.clone();

        self.increment_script
            .key(key)
            .arg(ttl_secs)
            .invoke_async(&mut conn)
            .await
            .map_err(|e: redis::RedisError| CounterError::Unavailable(e.to_string()))
    }

    async fn multi_get(&self, keys: &[String]) -> Result<Vec<Option<i64>>, CounterError> {
        if keys.is_empty() {
            return Ok(Vec::new());
        }
        let mut conn = self.conn.clone();

        let raw: Vec<Option<String>> = redis::cmd("MGET")
            .arg(keys)
            .query_async(&mut conn)
            .await
            .map_err(|e: redis::RedisError| CounterError::Unavailable(e.to_string()))?;

        keys.iter()
            .zip(raw)
            .map(|(key, value)| parse_counter(key, value))
            .collect()
    }

    async fn delete(&self, keys: &[String]) -> Result<(), CounterError> {
        if keys.is_empty() {
            return Ok(());
        }
        let mut conn = self.conn.clone();

        conn.del::<_, ()>(keys)
            .await
            .map_err(|e: redis::RedisError| CounterError::Unavailable(e.to_string()))
    }
}

impl std::fmt::Debug for RedisFastCounter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisFastCounter").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_counter_handles_absent_and_numeric() {
        assert_eq!(parse_counter("k", None).unwrap(), None);
        assert_eq!(parse_counter("k", Some("42".to_string())).unwrap(), Some(42));
    }

    #[test]
    fn parse_counter_rejects_garbage() {
        let err = parse_counter("k", Some("forty".to_string())).unwrap_err();
        assert!(matches!(err, CounterError::InvalidValue { ref key, .. } if key == "k"));
    }

    #[test]
    fn script_sets_expiry_only_on_first_increment() {
        assert!(INCREMENT_WITH_EXPIRY_SCRIPT.contains("if current == 1 then"));
        assert!(INCREMENT_WITH_EXPIRY_SCRIPT.contains("'EXPIRE', KEYS[1], ARGV[1]"));
    }

    // Live tests need a running Redis:
    //
    // #[tokio::test]
    // #[ignore] // Run with: cargo test -- --ignored
    // async fn increments_against_live_redis() {
    //     let client = redis::Client::open("redis://127.0.0.1/").unwrap();
    //     let conn = client.get_multiplexed_tokio_connection().await.unwrap();
    //     let counter = RedisFastCounter::new(conn);
    //     // ...
    // }
}

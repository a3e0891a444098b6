//! Redis-backed distributed lock.
//!
//! Acquire is `SET key token NX PX max_hold`. The token is unique per
//! acquisition, so a holder whose lease already expired can never release
//! a lock that another instance has since taken.

use async_trait::async_trait;
use redis::aio::MultiplexedConnection;
use redis::Script;
use std::time::{Duration, Instant};
use uuid::Uuid;

use crate::ports::{DistributedLock, LockError, LockLease, LockRequest};

const LOCK_KEY_PREFIX: &str = "lock:";

/// Token-checked release. Keeps the key alive for the rest of the minimum
/// hold (ARGV[2] ms), or deletes it once that has passed.
const RELEASE_SCRIPT: &str = r#"
if redis.call('GET', KEYS[1]) == ARGV[1] then
    local remaining = tonumber(ARGV[2])
    if remaining > 0 then
        return redis.call('PEXPIRE', KEYS[1], remaining)
    end
    return redis.call('DEL', KEYS[1])
end
return 0
"#;

/// Redis lease lock shared by every instance pointed at the same Redis.
#[derive(Clone)]
pub struct RedisDistributedLock {
    conn: MultiplexedConnection,
    release_script: Script,
}

impl RedisDistributedLock {
    pub fn new(conn: MultiplexedConnection) -> Self {
        Self {
            conn,
            release_script: Script::new(RELEASE_SCRIPT),
        }
    }

    fn key_for(name: &str) -> String {
        format!("{}{}", LOCK_KEY_PREFIX, name)
    }
}

fn millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

#[async_trait]
impl DistributedLock for RedisDistributedLock {
    async fn try_acquire(&self, request: &LockRequest) -> Result<Option<LockLease>, LockError> {
        let key = Self::key_for(&request.name);
        let token = Uuid::new_v4().to_string();
        let mut conn = self.conn.clone();

        let reply: Option<String> = redis::cmd("SET")
            .arg(&key)
            .arg(&token)
            .arg("NX")
            .arg("PX")
            .arg(millis(request.max_hold).max(1))
            .query_async(&mut conn)
            .await
            .map_err(|e: redis::RedisError| LockError::Unavailable(e.to_string()))?;

        if reply.is_none() {
            tracing::debug!(lock = %request.name, "Lock held elsewhere");
            return Ok(None);
        }

        tracing::debug!(lock = %request.name, token = %token, "Lock acquired");
        Ok(Some(LockLease {
            name: request.name.clone(),
            token,
            acquired_at: Instant::now(),
            min_hold: request.min_hold,
        }))
    }

    async fn release(&self, lease: LockLease) -> Result<(), LockError> {
        let key = Self::key_for(&lease.name);
        let remaining = millis(lease.remaining_min_hold(Instant::now()));
        let mut conn = self.conn.clone();

        let released: i64 = self
            .release_script
            .key(&key)
            .arg(&lease.token)
            .arg(remaining)
            .invoke_async(&mut conn)
            .await
            .map_err(|e: redis::RedisError| LockError::Unavailable(e.to_string()))?;

        if released == 0 {
            tracing::warn!(lock = %lease.name, "Lease had already expired before release");
        } else {
            tracing::debug!(lock = %lease.name, min_hold_left_ms = remaining, "Lock released");
        }
        Ok(())
    }
}

impl std::fmt::Debug for RedisDistributedLock {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisDistributedLock").finish_non_exhaustive()
    }
}

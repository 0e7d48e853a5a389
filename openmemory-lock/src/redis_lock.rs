//! Redis-backed lock manager: `SET NX PX` for acquisition, Lua scripts for
//! token-checked release and renew so the check-and-act is atomic even
//! with concurrent callers across processes.

use std::time::Duration;

use chrono::{DateTime, Utc};
use redis::{Commands, RedisError, Script};

use openmemory_core::errors::{OpenMemoryError, OpenMemoryResult};
use openmemory_core::memory::SystemLock;
use openmemory_core::traits::LockManager;

fn to_lock_err(err: RedisError) -> OpenMemoryError {
    OpenMemoryError::internal(err.to_string())
}

/// Releases only if the stored value matches `token`.
const RELEASE_SCRIPT: &str = r#"
if redis.call("get", KEYS[1]) == ARGV[1] then
    return redis.call("del", KEYS[1])
else
    return 0
end
"#;

/// Extends the TTL only if the stored value matches `token`.
const RENEW_SCRIPT: &str = r#"
if redis.call("get", KEYS[1]) == ARGV[1] then
    return redis.call("pexpire", KEYS[1], ARGV[2])
else
    return 0
end
"#;

pub struct RedisLockManager {
    client: redis::Client,
}

impl RedisLockManager {
    pub fn new(redis_url: &str) -> OpenMemoryResult<Self> {
        let client = redis::Client::open(redis_url).map_err(to_lock_err)?;
        Ok(Self { client })
    }

    fn key(name: &str) -> String {
        format!("om:lock:{name}")
    }

    fn conn(&self) -> OpenMemoryResult<redis::Connection> {
        self.client.get_connection().map_err(to_lock_err)
    }
}

impl LockManager for RedisLockManager {
    fn acquire(&self, name: &str, token: &str, ttl: Duration) -> OpenMemoryResult<Option<SystemLock>> {
        let mut conn = self.conn()?;
        let key = Self::key(name);
        let ttl_ms = ttl.as_millis().max(1) as usize;

        let acquired: bool = redis::cmd("SET")
            .arg(&key)
            .arg(token)
            .arg("NX")
            .arg("PX")
            .arg(ttl_ms)
            .query::<Option<String>>(&mut conn)
            .map_err(to_lock_err)?
            .is_some();

        if !acquired {
            // Might already be held by the same token — renewing counts as
            // reacquisition per the trait's reentrant-lease contract.
            return self.renew(name, token, ttl);
        }

        let now = Utc::now();
        Ok(Some(SystemLock {
            name: name.to_string(),
            token: token.to_string(),
            acquired_at: now,
            expires_at: now + chrono::Duration::from_std(ttl).unwrap_or(chrono::Duration::zero()),
        }))
    }

    fn release(&self, name: &str, token: &str) -> OpenMemoryResult<bool> {
        let mut conn = self.conn()?;
        let deleted: i64 =
            Script::new(RELEASE_SCRIPT).key(Self::key(name)).arg(token).invoke(&mut conn).map_err(to_lock_err)?;
        Ok(deleted > 0)
    }

    fn renew(&self, name: &str, token: &str, ttl: Duration) -> OpenMemoryResult<Option<SystemLock>> {
        let mut conn = self.conn()?;
        let ttl_ms = ttl.as_millis().max(1) as usize;
        let extended: i64 = Script::new(RENEW_SCRIPT)
            .key(Self::key(name))
            .arg(token)
            .arg(ttl_ms)
            .invoke(&mut conn)
            .map_err(to_lock_err)?;

        if extended == 0 {
            return Ok(None);
        }

        let now: DateTime<Utc> = Utc::now();
        Ok(Some(SystemLock {
            name: name.to_string(),
            token: token.to_string(),
            acquired_at: now,
            expires_at: now + chrono::Duration::from_std(ttl).unwrap_or(chrono::Duration::zero()),
        }))
    }

    fn is_locked(&self, name: &str) -> OpenMemoryResult<bool> {
        let mut conn = self.conn()?;
        let exists: bool = conn.exists(Self::key(name)).map_err(to_lock_err)?;
        Ok(exists)
    }
}

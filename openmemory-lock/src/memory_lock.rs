//! In-process lock manager backed by a `Mutex<HashMap>`. Useful for
//! single-process deployments and tests; holds no lease across restarts.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use chrono::Utc;

use openmemory_core::errors::{OpenMemoryError, OpenMemoryResult};
use openmemory_core::memory::SystemLock;
use openmemory_core::traits::LockManager;

pub struct InMemoryLockManager {
    leases: Mutex<HashMap<String, SystemLock>>,
}

impl Default for InMemoryLockManager {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryLockManager {
    pub fn new() -> Self {
        Self { leases: Mutex::new(HashMap::new()) }
    }

    fn locked(&self) -> OpenMemoryResult<std::sync::MutexGuard<'_, HashMap<String, SystemLock>>> {
        self.leases.lock().map_err(|e| OpenMemoryError::internal(format!("lock poisoned: {e}")))
    }
}

impl LockManager for InMemoryLockManager {
    fn acquire(&self, name: &str, token: &str, ttl: Duration) -> OpenMemoryResult<Option<SystemLock>> {
        let mut leases = self.locked()?;
        let now = Utc::now();

        if let Some(existing) = leases.get(name) {
            if !existing.is_expired(now) && !existing.owned_by(token) {
                return Ok(None);
            }
        }

        let lease = SystemLock {
            name: name.to_string(),
            token: token.to_string(),
            acquired_at: now,
            expires_at: now + chrono::Duration::from_std(ttl).unwrap_or(chrono::Duration::zero()),
        };
        leases.insert(name.to_string(), lease.clone());
        Ok(Some(lease))
    }

    fn release(&self, name: &str, token: &str) -> OpenMemoryResult<bool> {
        let mut leases = self.locked()?;
        match leases.get(name) {
            Some(existing) if existing.owned_by(token) => {
                leases.remove(name);
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    fn renew(&self, name: &str, token: &str, ttl: Duration) -> OpenMemoryResult<Option<SystemLock>> {
        let mut leases = self.locked()?;
        match leases.get(name) {
            Some(existing) if existing.owned_by(token) => {
                let now = Utc::now();
                let renewed = SystemLock {
                    name: name.to_string(),
                    token: token.to_string(),
                    acquired_at: existing.acquired_at,
                    expires_at: now + chrono::Duration::from_std(ttl).unwrap_or(chrono::Duration::zero()),
                };
                leases.insert(name.to_string(), renewed.clone());
                Ok(Some(renewed))
            }
            _ => Ok(None),
        }
    }

    fn is_locked(&self, name: &str) -> OpenMemoryResult<bool> {
        let leases = self.locked()?;
        Ok(leases.get(name).map(|l| !l.is_expired(Utc::now())).unwrap_or(false))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration as StdDuration;

    #[test]
    fn acquire_then_second_caller_is_rejected() {
        let mgr = InMemoryLockManager::new();
        let lease = mgr.acquire("maintenance", "a", StdDuration::from_secs(30)).unwrap();
        assert!(lease.is_some());
        assert!(mgr.acquire("maintenance", "b", StdDuration::from_secs(30)).unwrap().is_none());
    }

    #[test]
    fn same_token_reacquires() {
        let mgr = InMemoryLockManager::new();
        mgr.acquire("maintenance", "a", StdDuration::from_secs(30)).unwrap();
        assert!(mgr.acquire("maintenance", "a", StdDuration::from_secs(30)).unwrap().is_some());
    }

    #[test]
    fn release_requires_matching_token() {
        let mgr = InMemoryLockManager::new();
        mgr.acquire("maintenance", "a", StdDuration::from_secs(30)).unwrap();
        assert!(!mgr.release("maintenance", "b").unwrap());
        assert!(mgr.release("maintenance", "a").unwrap());
        assert!(!mgr.is_locked("maintenance").unwrap());
    }

    #[test]
    fn expired_lease_can_be_taken_by_another_token() {
        let mgr = InMemoryLockManager::new();
        mgr.acquire("maintenance", "a", StdDuration::from_millis(0)).unwrap();
        assert!(mgr.acquire("maintenance", "b", StdDuration::from_secs(30)).unwrap().is_some());
    }

    #[test]
    fn renew_extends_only_for_owner() {
        let mgr = InMemoryLockManager::new();
        mgr.acquire("maintenance", "a", StdDuration::from_secs(30)).unwrap();
        assert!(mgr.renew("maintenance", "b", StdDuration::from_secs(30)).unwrap().is_none());
        assert!(mgr.renew("maintenance", "a", StdDuration::from_secs(60)).unwrap().is_some());
    }
}

use std::time::Duration;

use crate::errors::OpenMemoryResult;
use crate::memory::SystemLock;

/// Distributed, token-owned, reentrant lease manager (spec.md §6).
///
/// A lock is owned by whichever caller holds its `token`; acquiring the
/// same name with the same token before expiry extends the lease rather
/// than failing.
pub trait LockManager: Send + Sync {
    /// Attempts to acquire `name` for `ttl`, returning the lease on success
    /// or `None` if another token currently holds it.
    fn acquire(&self, name: &str, token: &str, ttl: Duration) -> OpenMemoryResult<Option<SystemLock>>;

    /// Releases `name`, but only if `token` matches the current holder.
    fn release(&self, name: &str, token: &str) -> OpenMemoryResult<bool>;

    /// Extends an already-held lease by `ttl` from now.
    fn renew(&self, name: &str, token: &str, ttl: Duration) -> OpenMemoryResult<Option<SystemLock>>;

    fn is_locked(&self, name: &str) -> OpenMemoryResult<bool>;
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A held distributed lease, owned by whichever caller presents the
/// matching `token` (spec.md §6, lock manager).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemLock {
    pub name: String,
    pub token: String,
    pub acquired_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl SystemLock {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }

    pub fn owned_by(&self, token: &str) -> bool {
        self.token == token
    }
}

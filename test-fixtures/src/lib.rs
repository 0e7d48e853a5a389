//! Shared construction helpers for OpenMemory integration tests.
//!
//! Every crate's `tests/` directory that needs a fully wired runtime
//! (storage, vectors, HSG, temporal, locking) builds one through here
//! instead of repeating the same `OpenMemoryOptions` boilerplate.

use openmemory_core::config::OpenMemoryConfig;
use openmemory_facade::{OpenMemory, OpenMemoryOptions};

/// A fixed, non-secret key used only in tests — never derive a real
/// deployment's key material from this.
pub const TEST_MASTER_KEY: [u8; 32] = [7u8; 32];

/// Opens an in-memory `OpenMemory` instance with the default config and
/// `TEST_MASTER_KEY`. Deterministic and network-free: the embedding
/// engine's fallback chain lands on the TF-IDF provider with no API key
/// configured.
pub fn test_runtime() -> OpenMemory {
    test_runtime_with(OpenMemoryConfig::default())
}

pub fn test_runtime_with(config: OpenMemoryConfig) -> OpenMemory {
    OpenMemory::open(OpenMemoryOptions { config, master_key: TEST_MASTER_KEY, ..Default::default() })
        .expect("in-memory OpenMemory runtime should always open")
}

#[cfg(test)]
mod tests {
    use super::*;
    use openmemory_core::memory::TenantScope;
    use openmemory_hsg::AddOptions;

    #[test]
    fn test_runtime_opens_and_accepts_writes() {
        let runtime = test_runtime();
        let tenant = TenantScope::of("acme");
        let outcome = runtime.add(&tenant, "user-1", "remember this", AddOptions::default()).unwrap();
        assert!(runtime.get(&tenant, outcome.id).unwrap().is_some());
    }
}

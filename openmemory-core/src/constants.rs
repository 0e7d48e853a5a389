//! Fixed, non-configurable constants. Anything a deployer might reasonably
//! want to tune lives in [`crate::config`] instead.

/// Dimensionality of the default embedding model (spec.md §4.2).
pub const DEFAULT_EMBEDDING_DIM: usize = 384;

/// Length of the AEAD nonce, in bytes (AES-256-GCM).
pub const AEAD_NONCE_LEN: usize = 12;

/// Length of the derived content-encryption key, in bytes.
pub const CONTENT_KEY_LEN: usize = 32;

/// Current envelope format version tag, written as the `v1:` prefix.
pub const ENVELOPE_VERSION: &str = "v1";

/// Number of bits in a simhash fingerprint.
pub const SIMHASH_BITS: u32 = 64;

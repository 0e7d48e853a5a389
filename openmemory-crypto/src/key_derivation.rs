use hkdf::Hkdf;
use sha2::Sha256;

use openmemory_core::constants::CONTENT_KEY_LEN;
use openmemory_core::errors::{OpenMemoryResult, SecurityError};

/// Derives a per-memory content key from a master key using HKDF-SHA256.
///
/// `salt` is the memory id's bytes, so every memory gets an independent key
/// even though all memories share one master secret.
pub fn derive_content_key(master_key: &[u8], salt: &[u8], info: &str) -> OpenMemoryResult<[u8; CONTENT_KEY_LEN]> {
    let hk = Hkdf::<Sha256>::new(Some(salt), master_key);
    let mut out = [0u8; CONTENT_KEY_LEN];
    hk.expand(info.as_bytes(), &mut out).map_err(|_| {
        SecurityError::MalformedEnvelope { reason: "hkdf expand output too long".into() }.into()
    })?;
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derivation_is_deterministic() {
        let master = b"0123456789abcdef0123456789abcdef";
        let salt = b"memory-id-bytes";
        let a = derive_content_key(master, salt, "info").unwrap();
        let b = derive_content_key(master, salt, "info").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn different_salts_yield_different_keys() {
        let master = b"0123456789abcdef0123456789abcdef";
        let a = derive_content_key(master, b"salt-a", "info").unwrap();
        let b = derive_content_key(master, b"salt-b", "info").unwrap();
        assert_ne!(a, b);
    }
}

use aes_gcm::aead::{Aead, KeyInit};
use aes_gcm::{Aes256Gcm, Key, Nonce};
use base64::{engine::general_purpose::STANDARD, Engine};
use rand::RngCore;

use openmemory_core::constants::{AEAD_NONCE_LEN, ENVELOPE_VERSION};
use openmemory_core::errors::{OpenMemoryResult, SecurityError};

/// Encrypts `plaintext` under `key`, returning a `v1:<base64(nonce||ciphertext||tag)>`
/// envelope string.
pub fn seal(key: &[u8], plaintext: &[u8]) -> OpenMemoryResult<String> {
    let cipher = Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(key));

    let mut nonce_bytes = [0u8; AEAD_NONCE_LEN];
    rand::thread_rng().fill_bytes(&mut nonce_bytes);
    let nonce = Nonce::from_slice(&nonce_bytes);

    let ciphertext = cipher
        .encrypt(nonce, plaintext)
        .map_err(|_| SecurityError::MalformedEnvelope { reason: "encryption failed".into() })?;

    let mut payload = Vec::with_capacity(AEAD_NONCE_LEN + ciphertext.len());
    payload.extend_from_slice(&nonce_bytes);
    payload.extend_from_slice(&ciphertext);

    Ok(format!("{ENVELOPE_VERSION}:{}", STANDARD.encode(payload)))
}

/// Decrypts an envelope produced by [`seal`] using `key`.
pub fn open(key: &[u8], envelope: &str) -> OpenMemoryResult<Vec<u8>> {
    let (version, body) = envelope
        .split_once(':')
        .ok_or_else(|| SecurityError::MalformedEnvelope { reason: "missing version prefix".into() })?;

    if version != ENVELOPE_VERSION {
        return Err(SecurityError::MalformedEnvelope { reason: format!("unsupported envelope version {version}") }.into());
    }

    let payload = STANDARD
        .decode(body)
        .map_err(|e| SecurityError::MalformedEnvelope { reason: format!("invalid base64: {e}") })?;

    if payload.len() < AEAD_NONCE_LEN {
        return Err(SecurityError::MalformedEnvelope { reason: "payload shorter than nonce".into() }.into());
    }

    let (nonce_bytes, ciphertext) = payload.split_at(AEAD_NONCE_LEN);
    let cipher = Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(key));
    let nonce = Nonce::from_slice(nonce_bytes);

    cipher
        .decrypt(nonce, ciphertext)
        .map_err(|_| SecurityError::AuthenticationFailed.into())
}

/// Decrypts with `primary`, falling back to `secondary` if present and the
/// primary key fails authentication. Used during key rotation so memories
/// written under the old key stay readable until re-encrypted.
pub fn open_with_rotation(primary: &[u8], secondary: Option<&[u8]>, envelope: &str) -> OpenMemoryResult<Vec<u8>> {
    match open(primary, envelope) {
        Ok(plaintext) => Ok(plaintext),
        Err(primary_err) => match secondary {
            Some(key) => open(key, envelope),
            None => Err(primary_err),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const KEY: [u8; 32] = [7u8; 32];

    #[test]
    fn seal_then_open_round_trips() {
        let envelope = seal(&KEY, b"hello world").unwrap();
        assert!(envelope.starts_with("v1:"));
        let plaintext = open(&KEY, &envelope).unwrap();
        assert_eq!(plaintext, b"hello world");
    }

    #[test]
    fn wrong_key_fails_authentication() {
        let envelope = seal(&KEY, b"secret").unwrap();
        let wrong_key = [9u8; 32];
        let err = open(&wrong_key, &envelope).unwrap_err();
        assert!(matches!(
            err,
            openmemory_core::errors::OpenMemoryError::Security(
                openmemory_core::errors::SecurityError::AuthenticationFailed
            )
        ));
    }

    #[test]
    fn rotation_falls_back_to_secondary_key() {
        let old_key = [3u8; 32];
        let new_key = [4u8; 32];
        let envelope = seal(&old_key, b"legacy content").unwrap();
        let plaintext = open_with_rotation(&new_key, Some(&old_key), &envelope).unwrap();
        assert_eq!(plaintext, b"legacy content");
    }

    #[test]
    fn malformed_envelope_is_rejected() {
        assert!(open(&KEY, "garbage").is_err());
        assert!(open(&KEY, "v2:AAAA").is_err());
    }
}

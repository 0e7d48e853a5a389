use serde::{Deserialize, Serialize};

use super::defaults;

/// Content encryption envelope configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EncryptionConfig {
    /// HKDF `info` string mixed into content key derivation.
    pub hkdf_info: String,
    /// Whether a secondary key must still be accepted for decryption
    /// during rotation.
    pub accept_secondary_key: bool,
}

impl Default for EncryptionConfig {
    fn default() -> Self {
        Self {
            hkdf_info: defaults::DEFAULT_HKDF_INFO.to_string(),
            accept_secondary_key: true,
        }
    }
}

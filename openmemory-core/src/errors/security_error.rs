/// Encryption / key-management errors.
#[derive(Debug, thiserror::Error)]
pub enum SecurityError {
    #[error("decryption failed: authentication tag did not verify")]
    AuthenticationFailed,

    #[error("malformed envelope: {reason}")]
    MalformedEnvelope { reason: String },

    #[error("no encryption key configured")]
    NoKeyConfigured,

    #[error("policy denied: {reason}")]
    PolicyDenied { reason: String },
}

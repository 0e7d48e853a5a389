//! Error kinds for the OpenMemory core, aggregated into a single
//! top-level `OpenMemoryError` so callers match on kind rather than
//! on which subsystem raised it (spec.md §7).

mod security_error;
mod storage_error;
mod temporal_error;
mod vector_error;

pub use security_error::SecurityError;
pub use storage_error::StorageError;
pub use temporal_error::TemporalError;
pub use vector_error::VectorError;

/// Top-level error type returned by every fallible OpenMemory operation.
#[derive(Debug, thiserror::Error)]
pub enum OpenMemoryError {
    #[error("validation error: {message}")]
    Validation { message: String },

    #[error("not found: {message}")]
    NotFound { message: String },

    #[error("conflict: {message}")]
    Conflict { message: String },

    #[error("integrity error: {message}")]
    Integrity { message: String },

    #[error("timeout: {message}")]
    Timeout { message: String },

    #[error("unavailable: {message}")]
    Unavailable { message: String },

    #[error("internal error: {message}")]
    Internal { message: String },

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Vector(#[from] VectorError),

    #[error(transparent)]
    Temporal(#[from] TemporalError),

    #[error(transparent)]
    Security(#[from] SecurityError),
}

impl OpenMemoryError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation { message: message.into() }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound { message: message.into() }
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict { message: message.into() }
    }

    pub fn integrity(message: impl Into<String>) -> Self {
        Self::Integrity { message: message.into() }
    }

    pub fn timeout(message: impl Into<String>) -> Self {
        Self::Timeout { message: message.into() }
    }

    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable { message: message.into() }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal { message: message.into() }
    }

    /// Whether a caller may safely retry this operation without risking
    /// a duplicate side effect (spec.md §7: "callers must not retry blindly").
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Timeout { .. } | Self::Unavailable { .. })
    }
}

/// Convenience alias used as the return type of every public fallible function.
pub type OpenMemoryResult<T> = Result<T, OpenMemoryError>;

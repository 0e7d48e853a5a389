/// Vector store errors.
#[derive(Debug, thiserror::Error)]
pub enum VectorError {
    #[error("dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("vector is not finite (contains NaN or Inf)")]
    NotFinite,

    #[error("batch too large: {requested} ids, max {max}")]
    BatchTooLarge { requested: usize, max: usize },

    #[error("tenant set too large to materialize: {count} vectors")]
    TooLarge { count: usize },

    #[error("backend error: {message}")]
    Backend { message: String },
}

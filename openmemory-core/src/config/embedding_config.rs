use serde::{Deserialize, Serialize};

use super::defaults;
use crate::constants::DEFAULT_EMBEDDING_DIM;

/// Embedding subsystem configuration. Selects the primary provider; the
/// degradation chain always appends a TF-IDF fallback behind it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbeddingConfig {
    /// One of "onnx", "remote", "tfidf".
    pub provider: String,
    pub dimensions: usize,
    pub l1_cache_size: u64,
    /// Path to the ONNX model file, used when `provider = "onnx"`.
    pub onnx_model_path: Option<String>,
    /// Remote API settings, used when `provider = "remote"`.
    pub remote_model: Option<String>,
    pub remote_endpoint: Option<String>,
    pub remote_api_key: Option<String>,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            provider: defaults::DEFAULT_EMBEDDING_PROVIDER.to_string(),
            dimensions: DEFAULT_EMBEDDING_DIM,
            l1_cache_size: defaults::DEFAULT_L1_CACHE_SIZE,
            onnx_model_path: None,
            remote_model: None,
            remote_endpoint: None,
            remote_api_key: None,
        }
    }
}

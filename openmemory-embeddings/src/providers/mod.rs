mod onnx_provider;
mod remote_provider;
mod tfidf_fallback;

pub use onnx_provider::OnnxProvider;
pub use remote_provider::RemoteProvider;
pub use tfidf_fallback::TfIdfFallback;

use openmemory_core::config::EmbeddingConfig;
use openmemory_core::traits::Embedder;
use tracing::warn;

/// Build the primary provider from configuration. Falls back to TF-IDF
/// immediately if the configured provider can't be constructed — the
/// degradation chain appends a second TF-IDF anyway, so this never leaves
/// the engine without a working provider.
pub fn create_provider(config: &EmbeddingConfig) -> Box<dyn Embedder> {
    match config.provider.as_str() {
        "onnx" => match &config.onnx_model_path {
            Some(path) => match OnnxProvider::load(path, config.dimensions) {
                Ok(p) => Box::new(p),
                Err(e) => {
                    warn!(error = %e, "failed to load onnx model, falling back to tfidf");
                    Box::new(TfIdfFallback::new(config.dimensions))
                }
            },
            None => {
                warn!("provider=onnx but no onnx_model_path configured, falling back to tfidf");
                Box::new(TfIdfFallback::new(config.dimensions))
            }
        },
        "remote" => match (&config.remote_model, &config.remote_endpoint, &config.remote_api_key) {
            (Some(model), Some(endpoint), Some(key)) => {
                Box::new(RemoteProvider::new(model.clone(), key.clone(), endpoint.clone(), config.dimensions))
            }
            _ => {
                warn!("provider=remote but remote_model/endpoint/api_key incomplete, falling back to tfidf");
                Box::new(TfIdfFallback::new(config.dimensions))
            }
        },
        _ => Box::new(TfIdfFallback::new(config.dimensions)),
    }
}

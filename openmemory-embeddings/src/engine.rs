//! EmbeddingEngine — the main entry point for openmemory-embeddings.
//!
//! Coordinates provider selection, the degradation fallback chain, and the
//! L1 cache. Implements `Embedder` so it can be used as a drop-in provider
//! anywhere one is expected.

use openmemory_core::config::EmbeddingConfig;
use openmemory_core::errors::OpenMemoryResult;
use openmemory_core::traits::Embedder;
use tracing::info;

use crate::cache::L1MemoryCache;
use crate::degradation::{DegradationChain, DegradationEvent};
use crate::providers;

/// The main embedding engine.
pub struct EmbeddingEngine {
    chain: DegradationChain,
    cache: L1MemoryCache,
    config: EmbeddingConfig,
}

impl EmbeddingEngine {
    /// Create a new engine from configuration. Sets up the provider
    /// fallback chain and the L1 cache.
    pub fn new(config: EmbeddingConfig) -> Self {
        let mut chain = DegradationChain::new();

        let primary = providers::create_provider(&config);
        chain.push(primary);

        // TF-IDF always anchors the chain. create_provider may already have
        // returned it if the primary failed to construct; a redundant
        // second entry is harmless, the first available one wins.
        chain.push(Box::new(providers::TfIdfFallback::new(config.dimensions)));

        let cache = L1MemoryCache::new(config.l1_cache_size);

        info!(provider = chain.active_provider_name(), dims = config.dimensions, "embedding engine initialized");

        Self { chain, cache, config }
    }

    /// Embed arbitrary text, content-addressed through the L1 cache.
    pub fn embed_text(&mut self, text: &str) -> OpenMemoryResult<Vec<f32>> {
        let hash = blake3::hash(text.as_bytes()).to_hex().to_string();

        if let Some(vec) = self.cache.get(&hash) {
            return Ok(vec);
        }

        let (embedding, _provider) = self.chain.embed(text)?;
        self.cache.insert(hash, embedding.clone());
        Ok(embedding)
    }

    /// Embed a batch of texts, bypassing the cache (batches are assumed
    /// mostly cold; the chain still tries providers in order per call).
    pub fn embed_batch(&mut self, texts: &[String]) -> OpenMemoryResult<Vec<Vec<f32>>> {
        let (embeddings, _provider) = self.chain.embed_batch(texts)?;
        Ok(embeddings)
    }

    /// Drain accumulated degradation events.
    pub fn drain_degradation_events(&mut self) -> Vec<DegradationEvent> {
        self.chain.drain_events()
    }

    pub fn active_provider(&self) -> &str {
        self.chain.active_provider_name()
    }

    pub fn dimensions(&self) -> usize {
        self.config.dimensions
    }
}

/// Implement `Embedder` so the engine can be used as a drop-in provider
/// anywhere in the system. The trait is `&self`; the chain needs `&mut`
/// for event tracking, so this bypasses caching and degradation logging
/// and goes straight to a fresh TF-IDF fallback. `embed_text`/`embed_batch`
/// are the preferred entry points for cached, tracked access.
impl Embedder for EmbeddingEngine {
    fn embed(&self, text: &str) -> OpenMemoryResult<Vec<f32>> {
        let fallback = providers::TfIdfFallback::new(self.config.dimensions);
        fallback.embed(text)
    }

    fn embed_batch(&self, texts: &[String]) -> OpenMemoryResult<Vec<Vec<f32>>> {
        let fallback = providers::TfIdfFallback::new(self.config.dimensions);
        fallback.embed_batch(texts)
    }

    fn dimensions(&self) -> usize {
        self.config.dimensions
    }

    fn name(&self) -> &str {
        "openmemory-embedding-engine"
    }

    fn is_available(&self) -> bool {
        true // The engine always has at least TF-IDF.
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn default_engine() -> EmbeddingEngine {
        EmbeddingEngine::new(EmbeddingConfig { provider: "tfidf".to_string(), dimensions: 128, ..Default::default() })
    }

    #[test]
    fn engine_creates_with_defaults() {
        let engine = default_engine();
        assert_eq!(engine.dimensions(), 128);
    }

    #[test]
    fn embed_text_returns_correct_dims() {
        let mut engine = default_engine();
        let vec = engine.embed_text("test query").unwrap();
        assert_eq!(vec.len(), 128);
    }

    #[test]
    fn embed_text_caches() {
        let mut engine = default_engine();
        let a = engine.embed_text("cached query").unwrap();
        let b = engine.embed_text("cached query").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn trait_impl_works() {
        let engine = default_engine();
        let provider: &dyn Embedder = &engine;
        assert!(provider.is_available());
        assert_eq!(provider.dimensions(), 128);
        let vec = provider.embed("hello").unwrap();
        assert_eq!(vec.len(), 128);
    }

    #[test]
    fn trait_impl_batch() {
        let engine = default_engine();
        let provider: &dyn Embedder = &engine;
        let texts = vec!["a".to_string(), "b".to_string(), "c".to_string()];
        let vecs = provider.embed_batch(&texts).unwrap();
        assert_eq!(vecs.len(), 3);
        assert!(vecs.iter().all(|v| v.len() == 128));
    }

    #[test]
    fn no_degradation_events_on_success() {
        let mut engine = default_engine();
        engine.embed_text("test").unwrap();
        assert!(engine.drain_degradation_events().is_empty());
    }
}

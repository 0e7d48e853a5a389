//! Fallback chain for embedding generation.
//!
//! Chain: configured primary provider → TF-IDF. Every fallback is recorded
//! as a `DegradationEvent` so callers can surface it (logging, metrics)
//! without digging through trace output.

use chrono::{DateTime, Utc};
use openmemory_core::errors::{OpenMemoryError, OpenMemoryResult};
use openmemory_core::traits::Embedder;
use tracing::warn;

/// Recorded whenever the chain falls back past its primary provider.
#[derive(Debug, Clone)]
pub struct DegradationEvent {
    pub component: String,
    pub failure: String,
    pub fallback_used: String,
    pub timestamp: DateTime<Utc>,
}

struct ChainEntry {
    provider: Box<dyn Embedder>,
}

/// Manages the degradation fallback chain for embedding providers.
///
/// Tries providers in order. On failure, logs a degradation event and
/// moves to the next provider.
pub struct DegradationChain {
    chain: Vec<ChainEntry>,
    events: Vec<DegradationEvent>,
}

impl Default for DegradationChain {
    fn default() -> Self {
        Self::new()
    }
}

impl DegradationChain {
    pub fn new() -> Self {
        Self { chain: Vec::new(), events: Vec::new() }
    }

    /// Add a provider to the end of the chain.
    pub fn push(&mut self, provider: Box<dyn Embedder>) {
        self.chain.push(ChainEntry { provider });
    }

    /// Try to embed text using the fallback chain. Returns the embedding
    /// and the name of the provider that produced it. Logs a
    /// `DegradationEvent` for each fallback past the primary.
    pub fn embed(&mut self, text: &str) -> OpenMemoryResult<(Vec<f32>, &str)> {
        let mut last_error = None;

        for i in 0..self.chain.len() {
            if !self.chain[i].provider.is_available() {
                continue;
            }

            match self.chain[i].provider.embed(text) {
                Ok(vec) => {
                    if i > 0 {
                        let primary_name = self.chain[0].provider.name().to_string();
                        let fallback_name = self.chain[i].provider.name().to_string();
                        self.events.push(DegradationEvent {
                            component: "embeddings".to_string(),
                            failure: format!("{primary_name} unavailable"),
                            fallback_used: fallback_name,
                            timestamp: Utc::now(),
                        });
                    }
                    return Ok((vec, self.chain[i].provider.name()));
                }
                Err(e) => {
                    warn!(provider = self.chain[i].provider.name(), error = %e, "provider failed, trying next in chain");
                    last_error = Some(e);
                }
            }
        }

        Err(last_error.unwrap_or_else(|| OpenMemoryError::unavailable("all providers exhausted".to_string())))
    }

    /// Try to embed a batch using the fallback chain.
    pub fn embed_batch(&mut self, texts: &[String]) -> OpenMemoryResult<(Vec<Vec<f32>>, &str)> {
        let mut last_error = None;

        for i in 0..self.chain.len() {
            if !self.chain[i].provider.is_available() {
                continue;
            }

            match self.chain[i].provider.embed_batch(texts) {
                Ok(vecs) => {
                    if i > 0 {
                        let primary_name = self.chain[0].provider.name().to_string();
                        let fallback_name = self.chain[i].provider.name().to_string();
                        self.events.push(DegradationEvent {
                            component: "embeddings".to_string(),
                            failure: format!("{primary_name} unavailable"),
                            fallback_used: fallback_name,
                            timestamp: Utc::now(),
                        });
                    }
                    return Ok((vecs, self.chain[i].provider.name()));
                }
                Err(e) => {
                    warn!(provider = self.chain[i].provider.name(), error = %e, "batch embed failed, trying next in chain");
                    last_error = Some(e);
                }
            }
        }

        Err(last_error.unwrap_or_else(|| OpenMemoryError::unavailable("all providers exhausted".to_string())))
    }

    /// Get the name of the currently active (first available) provider.
    pub fn active_provider_name(&self) -> &str {
        self.chain.iter().find(|e| e.provider.is_available()).map(|e| e.provider.name()).unwrap_or("none")
    }

    /// Drain accumulated degradation events.
    pub fn drain_events(&mut self) -> Vec<DegradationEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn len(&self) -> usize {
        self.chain.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chain.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FailingProvider;
    impl Embedder for FailingProvider {
        fn embed(&self, _text: &str) -> OpenMemoryResult<Vec<f32>> {
            Err(OpenMemoryError::internal("mock failure".to_string()))
        }
        fn embed_batch(&self, _texts: &[String]) -> OpenMemoryResult<Vec<Vec<f32>>> {
            Err(OpenMemoryError::internal("mock failure".to_string()))
        }
        fn dimensions(&self) -> usize {
            128
        }
        fn name(&self) -> &str {
            "failing-mock"
        }
        fn is_available(&self) -> bool {
            true
        }
    }

    struct SuccessProvider {
        name: String,
        dims: usize,
    }
    impl Embedder for SuccessProvider {
        fn embed(&self, _text: &str) -> OpenMemoryResult<Vec<f32>> {
            Ok(vec![1.0; self.dims])
        }
        fn embed_batch(&self, texts: &[String]) -> OpenMemoryResult<Vec<Vec<f32>>> {
            Ok(texts.iter().map(|_| vec![1.0; self.dims]).collect())
        }
        fn dimensions(&self) -> usize {
            self.dims
        }
        fn name(&self) -> &str {
            &self.name
        }
        fn is_available(&self) -> bool {
            true
        }
    }

    #[test]
    fn primary_succeeds_no_degradation() {
        let mut chain = DegradationChain::new();
        chain.push(Box::new(SuccessProvider { name: "primary".to_string(), dims: 128 }));
        chain.push(Box::new(SuccessProvider { name: "fallback".to_string(), dims: 128 }));

        let (vec, name) = chain.embed("test").unwrap();
        assert_eq!(name, "primary");
        assert_eq!(vec.len(), 128);
        assert!(chain.drain_events().is_empty());
    }

    #[test]
    fn fallback_on_primary_failure() {
        let mut chain = DegradationChain::new();
        chain.push(Box::new(FailingProvider));
        chain.push(Box::new(SuccessProvider { name: "fallback".to_string(), dims: 64 }));

        let (vec, name) = chain.embed("test").unwrap();
        assert_eq!(name, "fallback");
        assert_eq!(vec.len(), 64);

        let events = chain.drain_events();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].fallback_used, "fallback");
    }

    #[test]
    fn all_fail_returns_error() {
        let mut chain = DegradationChain::new();
        chain.push(Box::new(FailingProvider));
        chain.push(Box::new(FailingProvider));

        let result = chain.embed("test");
        assert!(result.is_err());
    }

    #[test]
    fn batch_fallback() {
        let mut chain = DegradationChain::new();
        chain.push(Box::new(FailingProvider));
        chain.push(Box::new(SuccessProvider { name: "batch-fallback".to_string(), dims: 32 }));

        let texts = vec!["a".to_string(), "b".to_string()];
        let (vecs, name) = chain.embed_batch(&texts).unwrap();
        assert_eq!(name, "batch-fallback");
        assert_eq!(vecs.len(), 2);
    }
}

//! # openmemory-embeddings
//!
//! Multi-provider embedding generation: ONNX local inference, a remote
//! HTTP API client, and a TF-IDF fallback, composed into a degradation
//! chain behind an L1 cache.

pub mod cache;
pub mod degradation;
pub mod engine;
pub mod providers;

pub use degradation::{DegradationChain, DegradationEvent};
pub use engine::EmbeddingEngine;

//! # openmemory-retrieval
//!
//! Hybrid retrieval: fuses per-sector ANN candidate lists by RRF, then
//! scores each candidate with a composite of cosine similarity, keyword
//! overlap, BM25, waypoint boost, recency, tag match and salience
//! (spec.md §4.3). Pure compute — storage, vector search and waypoint
//! lookups are all supplied by the caller.

pub mod bm25;
pub mod engine;
pub mod fusion;
pub mod keyword;
pub mod scorer;
pub mod tokenize;
pub mod waypoint_boost;

pub use engine::RetrievalEngine;
pub use scorer::{Candidate, ScoreComponents, ScoredMemory};

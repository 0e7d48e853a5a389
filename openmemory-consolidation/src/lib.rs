//! # openmemory-consolidation
//!
//! Clusters cold, waypoint-orphaned memories by embedding similarity
//! within a sector (HDBSCAN) and proposes slow-memory summarization plans
//! (spec.md §4.4). Pure compute — callers own candidate selection, plan
//! application and waypoint rewriting.

pub mod algorithms;
pub mod clustering;
pub mod engine;
pub mod summarize;

pub use engine::{ColdCandidate, ConsolidationEngine, ConsolidationPlan};

//! # openmemory-decay
//!
//! Per-sector exponential salience decay: `salience <- salience *
//! exp(-lambda * elapsed_days)`, plus the salience-floor check that flags a
//! memory as a consolidation candidate.

pub mod eligibility;
pub mod engine;
pub mod formula;

pub use engine::DecayEngine;

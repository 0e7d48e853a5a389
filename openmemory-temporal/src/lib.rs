//! # openmemory-temporal
//!
//! Bitemporal fact reasoning: supersession on re-assertion, point/range
//! queries, snapshot comparison, change-frequency analytics, and the
//! periodic confidence-decay sweep (spec.md §4.5). Pure compute — facts
//! are supplied and persisted by the caller.

pub mod compare;
pub mod decay;
pub mod edge;
pub mod engine;
pub mod frequency;
pub mod insert;
pub mod invalidate;
pub mod query;

pub use compare::Comparison;
pub use decay::DecayOutcome;
pub use edge::EdgeInsertOutcome;
pub use engine::TemporalEngine;
pub use frequency::ChangeFrequency;
pub use insert::InsertOutcome;

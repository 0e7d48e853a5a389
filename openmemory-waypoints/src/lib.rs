//! # openmemory-waypoints
//!
//! Coactivation buffering and weighted waypoint reinforcement/pruning
//! (spec.md §4.3). The waypoint graph itself is a flat, storage-backed edge
//! table, not an in-memory object graph — this crate holds only the pure
//! reinforcement/prune logic and the in-process coactivation buffer that
//! sits between a search and the periodic flush.

pub mod coactivation;
pub mod engine;
pub mod pruning;
pub mod reinforcement;

pub use coactivation::CoactivationBuffer;
pub use engine::WaypointEngine;

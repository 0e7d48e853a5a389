//! # openmemory-facade
//!
//! The published library surface (spec.md §6): wires storage, vectors,
//! the HSG engine, temporal reasoning, locking and the maintenance
//! scheduler behind one `OpenMemory` handle.

mod ide;
mod maintenance;
mod options;
mod runtime;
mod temporal;
mod view;

pub use ide::{IdeContext, IdePatterns};
pub use openmemory_hsg::{AddOptions, AddOutcome, SearchOptions, SearchResult, UpdateOptions, UpdateOutcome};
pub use openmemory_temporal::{ChangeFrequency, Comparison, EdgeInsertOutcome, InsertOutcome};
pub use options::{LockBackend, OpenMemoryOptions};
pub use runtime::OpenMemory;
pub use view::MemoryView;

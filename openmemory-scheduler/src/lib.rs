//! # openmemory-scheduler
//!
//! Named periodic maintenance task registry. Each task runs on its own
//! interval, serialized across callers by a [`openmemory_lock::LockManager`]
//! lease, and is disabled after too many consecutive failures so a broken
//! task degrades gracefully instead of spinning forever.

pub mod engine;
pub mod registry;
pub mod task;

pub use engine::Scheduler;
pub use registry::TaskEntry;
pub use task::{FnTask, MaintenanceTask};

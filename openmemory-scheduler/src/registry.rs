use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::time::Duration;

use crate::task::MaintenanceTask;

/// A registered task plus its schedule and failure-isolation bookkeeping.
///
/// Each task tracks its own consecutive-failure count independently, so one
/// misbehaving task (e.g. decay sweep hitting a locked database) never
/// affects the others' schedules.
pub struct TaskEntry {
    pub(crate) task: Box<dyn MaintenanceTask>,
    pub(crate) interval: Duration,
    pub(crate) lock_ttl: Duration,
    consecutive_failures: AtomicU32,
    disabled: AtomicBool,
}

impl TaskEntry {
    pub fn new(task: Box<dyn MaintenanceTask>, interval: Duration, lock_ttl: Duration) -> Self {
        Self { task, interval, lock_ttl, consecutive_failures: AtomicU32::new(0), disabled: AtomicBool::new(false) }
    }

    pub fn name(&self) -> &str {
        self.task.name()
    }

    pub fn is_disabled(&self) -> bool {
        self.disabled.load(Ordering::SeqCst)
    }

    pub fn consecutive_failures(&self) -> u32 {
        self.consecutive_failures.load(Ordering::SeqCst)
    }

    pub(crate) fn record_success(&self) {
        self.consecutive_failures.store(0, Ordering::SeqCst);
    }

    /// Returns the new failure count. Caller disables the task once it
    /// crosses the configured threshold.
    pub(crate) fn record_failure(&self) -> u32 {
        self.consecutive_failures.fetch_add(1, Ordering::SeqCst) + 1
    }

    pub(crate) fn disable(&self) {
        self.disabled.store(true, Ordering::SeqCst);
    }

    /// Re-enables a disabled task, resetting its failure count. Used by
    /// operators to recover a task after fixing the underlying cause.
    pub fn reenable(&self) {
        self.consecutive_failures.store(0, Ordering::SeqCst);
        self.disabled.store(false, Ordering::SeqCst);
    }
}

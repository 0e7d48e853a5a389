use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;
use std::time::Duration;

use openmemory_core::config::SchedulerConfig;
use openmemory_core::errors::{OpenMemoryError, OpenMemoryResult};
use openmemory_lock::InMemoryLockManager;
use openmemory_core::traits::LockManager;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::registry::TaskEntry;
use crate::task::MaintenanceTask;

/// Runs registered [`MaintenanceTask`]s on their own interval, serializing
/// each run through a [`LockManager`] lease so that two scheduler instances
/// (e.g. two replicas of the same service) never run the same task at once.
///
/// A task that fails `max_consecutive_failures` times in a row is disabled
/// rather than retried forever; `reenable` brings it back once the operator
/// has dealt with the underlying cause.
pub struct Scheduler {
    lock: Arc<dyn LockManager>,
    config: SchedulerConfig,
    tasks: Vec<Arc<TaskEntry>>,
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::new(Arc::new(InMemoryLockManager::new()), SchedulerConfig::default())
    }
}

impl Scheduler {
    pub fn new(lock: Arc<dyn LockManager>, config: SchedulerConfig) -> Self {
        Self { lock, config, tasks: Vec::new() }
    }

    /// Registers a task on a fixed interval. `lock_ttl` should comfortably
    /// exceed how long a single run is expected to take, so a renewal
    /// isn't needed mid-run.
    pub fn register(&mut self, task: Box<dyn MaintenanceTask>, interval: Duration, lock_ttl: Duration) {
        self.tasks.push(Arc::new(TaskEntry::new(task, interval, lock_ttl)));
    }

    pub fn task_names(&self) -> Vec<&str> {
        self.tasks.iter().map(|t| t.name()).collect()
    }

    pub fn entry(&self, name: &str) -> Option<&Arc<TaskEntry>> {
        self.tasks.iter().find(|t| t.name() == name)
    }

    /// Runs a single named task once, under its lease. Returns
    /// `Unavailable` if the task is disabled or the lease is already held
    /// elsewhere, and `NotFound` if no such task is registered.
    pub fn run_once(&self, name: &str) -> OpenMemoryResult<()> {
        let entry = self.entry(name).ok_or_else(|| OpenMemoryError::not_found(format!("no such task: {name}")))?;
        Self::run_entry(&self.lock, entry, self.config.max_consecutive_failures)
    }

    fn run_entry(lock: &Arc<dyn LockManager>, entry: &Arc<TaskEntry>, max_failures: u32) -> OpenMemoryResult<()> {
        if entry.is_disabled() {
            return Err(OpenMemoryError::unavailable(format!("task '{}' disabled after repeated failures", entry.name())));
        }

        let lock_name = format!("scheduler:{}", entry.name());
        let token = Uuid::new_v4().to_string();
        let lease = lock.acquire(&lock_name, &token, entry.lock_ttl)?;
        let Some(lease) = lease else {
            info!(task = entry.name(), "skipping run, lease held elsewhere");
            return Ok(());
        };

        let result = catch_unwind(AssertUnwindSafe(|| entry.task.run()));
        let _ = lock.release(&lease.name, &token);

        match result {
            Ok(Ok(())) => {
                entry.record_success();
                info!(task = entry.name(), "run succeeded");
                Ok(())
            }
            Ok(Err(err)) => {
                Self::handle_failure(entry, max_failures, err.to_string());
                Err(err)
            }
            Err(panic) => {
                let message = panic_message(panic);
                Self::handle_failure(entry, max_failures, message.clone());
                Err(OpenMemoryError::internal(format!("task '{}' panicked: {message}", entry.name())))
            }
        }
    }

    fn handle_failure(entry: &Arc<TaskEntry>, max_failures: u32, message: String) {
        let count = entry.record_failure();
        warn!(task = entry.name(), failures = count, error = %message, "run failed");
        if count >= max_failures {
            entry.disable();
            error!(task = entry.name(), failures = count, "disabling task after repeated failures");
        }
    }

    /// Spawns one tokio task per registered maintenance task, each ticking
    /// on its own interval for as long as the returned handles are held.
    /// Each tick's work runs on a blocking thread since task bodies do
    /// synchronous I/O.
    pub fn spawn_all(self: &Arc<Self>) -> Vec<tokio::task::JoinHandle<()>> {
        self.tasks
            .iter()
            .cloned()
            .map(|entry| {
                let lock = Arc::clone(&self.lock);
                let max_failures = self.config.max_consecutive_failures;
                let interval = entry.interval;
                tokio::spawn(async move {
                    let mut ticker = tokio::time::interval(interval);
                    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
                    loop {
                        ticker.tick().await;
                        if entry.is_disabled() {
                            continue;
                        }
                        let lock = Arc::clone(&lock);
                        let entry = Arc::clone(&entry);
                        let _ = tokio::task::spawn_blocking(move || Self::run_entry(&lock, &entry, max_failures)).await;
                    }
                })
            })
            .collect()
    }
}

fn panic_message(panic: Box<dyn std::any::Any + Send>) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::FnTask;
    use std::sync::atomic::{AtomicU32, Ordering as AtomicOrdering};

    fn scheduler(max_failures: u32) -> Scheduler {
        Scheduler::new(Arc::new(InMemoryLockManager::new()), SchedulerConfig { max_consecutive_failures: max_failures })
    }

    #[test]
    fn successful_run_resets_failure_count() {
        let mut s = scheduler(3);
        s.register(Box::new(FnTask::new("ok", || Ok(()))), Duration::from_secs(60), Duration::from_secs(10));
        s.run_once("ok").unwrap();
        assert_eq!(s.entry("ok").unwrap().consecutive_failures(), 0);
    }

    #[test]
    fn repeated_failures_disable_task() {
        let mut s = scheduler(2);
        s.register(
            Box::new(FnTask::new("bad", || Err(OpenMemoryError::internal("boom")))),
            Duration::from_secs(60),
            Duration::from_secs(10),
        );
        assert!(s.run_once("bad").is_err());
        assert!(!s.entry("bad").unwrap().is_disabled());
        assert!(s.run_once("bad").is_err());
        assert!(s.entry("bad").unwrap().is_disabled());

        let err = s.run_once("bad").unwrap_err();
        assert!(matches!(err, OpenMemoryError::Unavailable { .. }));
    }

    #[test]
    fn panicking_task_is_isolated_and_counted_as_failure() {
        let mut s = scheduler(5);
        s.register(Box::new(FnTask::new("panics", || panic!("unexpected"))), Duration::from_secs(60), Duration::from_secs(10));
        let err = s.run_once("panics").unwrap_err();
        assert!(err.to_string().contains("panicked"));
        assert_eq!(s.entry("panics").unwrap().consecutive_failures(), 1);
    }

    #[test]
    fn reenable_clears_disabled_state() {
        let mut s = scheduler(1);
        s.register(Box::new(FnTask::new("bad", || Err(OpenMemoryError::internal("boom")))), Duration::from_secs(60), Duration::from_secs(10));
        s.run_once("bad").unwrap_err();
        assert!(s.entry("bad").unwrap().is_disabled());
        s.entry("bad").unwrap().reenable();
        assert!(!s.entry("bad").unwrap().is_disabled());
    }

    #[test]
    fn unknown_task_is_not_found() {
        let s = scheduler(3);
        let err = s.run_once("missing").unwrap_err();
        assert!(matches!(err, OpenMemoryError::NotFound { .. }));
    }

    #[tokio::test]
    async fn spawn_all_runs_task_on_interval() {
        let counter = Arc::new(AtomicU32::new(0));
        let mut s = scheduler(3);
        let c = Arc::clone(&counter);
        s.register(
            Box::new(FnTask::new("tick", move || {
                c.fetch_add(1, AtomicOrdering::SeqCst);
                Ok(())
            })),
            Duration::from_millis(10),
            Duration::from_secs(5),
        );
        let scheduler = Arc::new(s);
        let handles = scheduler.spawn_all();
        tokio::time::sleep(Duration::from_millis(60)).await;
        for h in handles {
            h.abort();
        }
        assert!(counter.load(AtomicOrdering::SeqCst) >= 2);
    }
}

use openmemory_core::errors::OpenMemoryResult;

/// A named unit of maintenance work: decay sweep, waypoint pruning,
/// consolidation, lock vacuum. Implementations are sync — they wrap
/// blocking storage/lock calls and are always run on a blocking thread.
pub trait MaintenanceTask: Send + Sync {
    fn name(&self) -> &str;
    fn run(&self) -> OpenMemoryResult<()>;
}

/// Wraps a plain closure as a [`MaintenanceTask`] for tests and simple
/// one-off jobs.
pub struct FnTask<F> {
    name: String,
    f: F,
}

impl<F> FnTask<F>
where
    F: Fn() -> OpenMemoryResult<()> + Send + Sync,
{
    pub fn new(name: impl Into<String>, f: F) -> Self {
        Self { name: name.into(), f }
    }
}

impl<F> MaintenanceTask for FnTask<F>
where
    F: Fn() -> OpenMemoryResult<()> + Send + Sync,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn run(&self) -> OpenMemoryResult<()> {
        (self.f)()
    }
}

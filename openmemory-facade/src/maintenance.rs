//! Default maintenance tasks (spec.md §4.7, §4.8), registered against the
//! scheduler at `OpenMemory::open` time but left to the caller to actually
//! drive via `run_maintenance_task` or `spawn_maintenance`.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tracing::info;
use uuid::Uuid;

use openmemory_core::config::OpenMemoryConfig;
use openmemory_core::memory::TenantScope;
use openmemory_core::traits::{MetadataStore, VectorStore};
use openmemory_hsg::HsgEngine;
use openmemory_scheduler::{FnTask, Scheduler};
use openmemory_storage::StorageEngine;
use openmemory_temporal::{DecayOutcome, TemporalEngine};
use openmemory_waypoints::WaypointEngine;

const DECAY_LOCK_TTL: Duration = Duration::from_secs(2 * 60);
const CONSOLIDATION_INTERVAL: Duration = Duration::from_secs(6 * 60 * 60);
const CONSOLIDATION_LOCK_TTL: Duration = Duration::from_secs(30 * 60);
const COACTIVATION_FLUSH_INTERVAL: Duration = Duration::from_secs(60);
const COACTIVATION_FLUSH_LOCK_TTL: Duration = Duration::from_secs(30);
const WAYPOINT_PRUNE_INTERVAL: Duration = Duration::from_secs(60 * 60);
const WAYPOINT_PRUNE_LOCK_TTL: Duration = Duration::from_secs(10 * 60);
const ORPHAN_VECTOR_PRUNE_INTERVAL: Duration = Duration::from_secs(24 * 60 * 60);
const ORPHAN_VECTOR_PRUNE_LOCK_TTL: Duration = Duration::from_secs(30 * 60);
const CONFIDENCE_DECAY_INTERVAL: Duration = Duration::from_secs(60 * 60);
const CONFIDENCE_DECAY_LOCK_TTL: Duration = Duration::from_secs(10 * 60);
const VACUUM_INTERVAL: Duration = Duration::from_secs(24 * 60 * 60);
const VACUUM_LOCK_TTL: Duration = Duration::from_secs(30 * 60);

/// Registers the standing maintenance tasks this system runs: salience
/// decay, consolidation, coactivation flush/prune, full-graph waypoint
/// prune, orphan vector prune, temporal confidence decay, and storage
/// vacuum. Maintenance callers always see `TenantScope::Any` — each task
/// sweeps every tenant in one pass rather than being re-run per tenant.
pub fn register_default_tasks(
    scheduler: &mut Scheduler,
    storage: Arc<StorageEngine>,
    hsg: Arc<HsgEngine>,
    temporal: Arc<TemporalEngine>,
    vectors: Arc<dyn VectorStore>,
    config: &OpenMemoryConfig,
) {
    let decay_interval = Duration::from_secs(config.decay.processing_interval_secs);
    let hsg_decay = Arc::clone(&hsg);
    scheduler.register(
        Box::new(FnTask::new("decay", move || hsg_decay.run_decay(&TenantScope::Any).map(|_| ()))),
        decay_interval,
        DECAY_LOCK_TTL,
    );

    let hsg_consolidation = Arc::clone(&hsg);
    scheduler.register(
        Box::new(FnTask::new("consolidation", move || hsg_consolidation.run_consolidation(&TenantScope::Any).map(|_| ()))),
        CONSOLIDATION_INTERVAL,
        CONSOLIDATION_LOCK_TTL,
    );

    let hsg_flush = Arc::clone(&hsg);
    scheduler.register(
        Box::new(FnTask::new("coactivation_flush", move || hsg_flush.flush_coactivations().map(|_| ()))),
        COACTIVATION_FLUSH_INTERVAL,
        COACTIVATION_FLUSH_LOCK_TTL,
    );

    let storage_for_prune = Arc::clone(&storage);
    let waypoint_engine = WaypointEngine::new(config.waypoints.clone());
    scheduler.register(
        Box::new(FnTask::new("waypoint_prune", move || prune_waypoints(&storage_for_prune, &waypoint_engine))),
        WAYPOINT_PRUNE_INTERVAL,
        WAYPOINT_PRUNE_LOCK_TTL,
    );

    let storage_for_orphans = Arc::clone(&storage);
    let vectors_for_orphans = Arc::clone(&vectors);
    scheduler.register(
        Box::new(FnTask::new("orphan_vector_prune", move || prune_orphan_vectors(&storage_for_orphans, vectors_for_orphans.as_ref()))),
        ORPHAN_VECTOR_PRUNE_INTERVAL,
        ORPHAN_VECTOR_PRUNE_LOCK_TTL,
    );

    let storage_for_confidence_decay = Arc::clone(&storage);
    scheduler.register(
        Box::new(FnTask::new("confidence_decay", move || {
            run_confidence_decay(&storage_for_confidence_decay, &temporal)
        })),
        CONFIDENCE_DECAY_INTERVAL,
        CONFIDENCE_DECAY_LOCK_TTL,
    );

    scheduler.register(Box::new(FnTask::new("vacuum", move || storage.vacuum())), VACUUM_INTERVAL, VACUUM_LOCK_TTL);
}

/// Prunes the full waypoint graph rather than just the edges a coactivation
/// flush happened to touch. `WaypointEngine::prune` only reports counts, so
/// the removed edges are recovered by diffing `(from, to)` pairs against
/// what it kept.
fn prune_waypoints(storage: &StorageEngine, engine: &WaypointEngine) -> openmemory_core::OpenMemoryResult<()> {
    let all = storage.all_waypoints()?;
    let original_pairs: HashSet<(Uuid, Uuid)> = all.iter().map(|w| (w.from_memory_id, w.to_memory_id)).collect();

    let (kept, result) = engine.prune(all);
    let kept_pairs: HashSet<(Uuid, Uuid)> = kept.iter().map(|w| (w.from_memory_id, w.to_memory_id)).collect();

    for (from, to) in original_pairs.difference(&kept_pairs) {
        storage.delete_waypoint(*from, *to)?;
    }
    info!(removed = result.edges_removed, kept = result.edges_kept, "waypoint prune complete");
    Ok(())
}

/// Deletes vectors whose owning memory no longer exists (spec.md §4.8).
/// Diffs the vector store's full id set against a bulk metadata lookup
/// rather than fetching memories one at a time.
fn prune_orphan_vectors(storage: &StorageEngine, vectors: &dyn VectorStore) -> openmemory_core::OpenMemoryResult<()> {
    let vector_ids = vectors.all_memory_ids()?;
    if vector_ids.is_empty() {
        return Ok(());
    }

    let existing: HashSet<Uuid> = storage.get_bulk(&TenantScope::Any, &vector_ids)?.into_iter().map(|m| m.id).collect();
    let mut removed = 0usize;
    for id in vector_ids {
        if !existing.contains(&id) {
            vectors.delete_all_sectors(id)?;
            removed += 1;
        }
    }
    info!(removed, "orphan vector prune complete");
    Ok(())
}

/// Sweeps every active fact's confidence down and auto-closes the ones
/// that drop below the configured floor (spec.md §4.5 "Confidence decay").
fn run_confidence_decay(storage: &StorageEngine, temporal: &TemporalEngine) -> openmemory_core::OpenMemoryResult<()> {
    let active = storage.all_active_facts(&TenantScope::Any)?;
    let now = Utc::now();
    let outcomes = temporal.decay_sweep(&active, now);

    let mut decayed = 0usize;
    let mut closed = 0usize;
    for outcome in outcomes {
        let fact = match outcome {
            DecayOutcome::Decayed(f) => {
                decayed += 1;
                f
            }
            DecayOutcome::AutoClosed(f) => {
                closed += 1;
                f
            }
        };
        storage.update_fact(&TenantScope::Any, &fact)?;
    }
    info!(decayed, closed, "confidence decay sweep complete");
    Ok(())
}

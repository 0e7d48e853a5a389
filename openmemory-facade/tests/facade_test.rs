//! End-to-end coverage of the published library surface (spec.md §6):
//! `add`/`get`/`update`/`delete`/`search`, `Temporal.*`, and maintenance
//! triggers, all driven through one in-memory `OpenMemory` instance.

use chrono::Utc;
use std::collections::HashMap;

use openmemory_core::memory::TenantScope;
use openmemory_facade::{AddOptions, OpenMemory, OpenMemoryOptions, SearchOptions, UpdateOptions, UpdateOutcome};

fn runtime() -> OpenMemory {
    OpenMemory::open(OpenMemoryOptions { master_key: [3u8; 32], ..Default::default() }).unwrap()
}

#[test]
fn add_then_get_round_trips_plaintext() {
    let runtime = runtime();
    let tenant = TenantScope::of("acme");

    let outcome = runtime.add(&tenant, "user-1", "the onboarding doc lives in docs/onboarding.md", AddOptions::default()).unwrap();
    assert!(outcome.duplicate_of.is_none());

    let view = runtime.get(&tenant, outcome.id).unwrap().unwrap();
    assert_eq!(view.content, "the onboarding doc lives in docs/onboarding.md");
    assert_eq!(view.user_id, "user-1");
}

#[test]
fn get_is_scoped_to_tenant() {
    let runtime = runtime();
    let acme = TenantScope::of("acme");
    let globex = TenantScope::of("globex");

    let outcome = runtime.add(&acme, "user-1", "acme-only content", AddOptions::default()).unwrap();
    assert!(runtime.get(&globex, outcome.id).unwrap().is_none());
    assert!(runtime.get(&acme, outcome.id).unwrap().is_some());
}

#[test]
fn update_changes_content_and_delete_removes_it() {
    let runtime = runtime();
    let tenant = TenantScope::of("acme");

    let outcome = runtime.add(&tenant, "user-1", "first draft", AddOptions::default()).unwrap();
    let update = runtime
        .update(&tenant, outcome.id, UpdateOptions { content: Some("revised draft".into()), ..Default::default() })
        .unwrap();
    let UpdateOutcome::Updated(memory) = update else { panic!("expected Updated") };
    assert_eq!(memory.id, outcome.id);

    let view = runtime.get(&tenant, outcome.id).unwrap().unwrap();
    assert_eq!(view.content, "revised draft");

    assert!(runtime.delete(&tenant, outcome.id).unwrap());
    assert!(runtime.get(&tenant, outcome.id).unwrap().is_none());
}

#[test]
fn search_finds_a_memory_by_its_own_content() {
    let runtime = runtime();
    let tenant = TenantScope::of("acme");

    runtime.add(&tenant, "user-1", "the deploy pipeline uses GitHub Actions", AddOptions::default()).unwrap();
    let results = runtime.search(&tenant, "deploy pipeline", SearchOptions::default()).unwrap();
    assert!(!results.is_empty());
}

#[test]
fn temporal_insert_then_supersede_closes_the_old_fact() {
    let runtime = runtime();
    let tenant = TenantScope::of("acme");
    let now = Utc::now();

    runtime.insert_fact(&tenant, "user-1", "alice", "role", "engineer", now, 0.9, HashMap::new()).unwrap();
    runtime
        .insert_fact(&tenant, "user-1", "alice", "role", "manager", now + chrono::Duration::days(1), 0.9, HashMap::new())
        .unwrap();

    let timeline = runtime.timeline(&tenant, "user-1", "alice").unwrap();
    assert_eq!(timeline.len(), 2);
    assert!(timeline.iter().any(|f| f.object == "engineer" && !f.is_active()));
    assert!(timeline.iter().any(|f| f.object == "manager" && f.is_active()));
}

#[test]
fn invalidate_fact_closes_it_explicitly() {
    let runtime = runtime();
    let tenant = TenantScope::of("acme");
    let now = Utc::now();

    let outcome = runtime.insert_fact(&tenant, "user-1", "bob", "status", "active", now, 0.9, HashMap::new()).unwrap();
    let fact_id = match outcome {
        openmemory_temporal::InsertOutcome::Created(f) => f.id,
        other => panic!("expected Created, got {other:?}"),
    };

    let closed = runtime.invalidate_fact(&tenant, fact_id, now + chrono::Duration::hours(1)).unwrap();
    assert!(!closed.is_active());
}

#[test]
fn maintenance_tasks_run_without_error_on_an_empty_store() {
    let runtime = runtime();
    for task in ["decay", "consolidation", "coactivation_flush", "waypoint_prune", "orphan_vector_prune", "confidence_decay", "vacuum"]
    {
        runtime.run_maintenance_task(task).unwrap();
    }
}

#[test]
fn ide_get_context_surfaces_matching_memories_and_active_facts() {
    let runtime = runtime();
    let tenant = TenantScope::of("acme");
    let now = Utc::now();

    runtime.add(&tenant, "user-1", "carol prefers async standups", AddOptions::default()).unwrap();
    runtime.insert_fact(&tenant, "user-1", "carol", "timezone", "UTC-5", now, 0.9, HashMap::new()).unwrap();

    let context = runtime.get_context(&tenant, "user-1", "carol", SearchOptions::default()).unwrap();
    assert_eq!(context.active_facts.len(), 1);
}

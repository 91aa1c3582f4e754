//! Checkpoints and resumed runs.

use checkpoint::{CheckpointFile, CheckpointStore, FilesystemStore};
use perf_monitor::PerformanceMonitor;
use seed_core::EntityKind;
use seed_populate::{
    CommittedCounts, EntityStore, MemoryStore, Orchestrator, PopulateError, RunCheckpoint,
};
use std::collections::BTreeMap;
use std::sync::Arc;

use crate::{fixture_config, populate};

#[tokio::test]
async fn test_every_phase_writes_a_checkpoint() {
    let dir = tempfile::tempdir().unwrap();
    let checkpoints = Arc::new(FilesystemStore::new(dir.path()));
    let store = Arc::new(MemoryStore::new());

    Orchestrator::new(
        fixture_config().validate().unwrap(),
        store,
        Arc::new(PerformanceMonitor::new()),
    )
    .with_checkpoints(checkpoints.clone())
    .run()
    .await
    .unwrap();

    let files = std::fs::read_dir(dir.path()).unwrap().count();
    assert_eq!(files, EntityKind::ALL.len());

    let latest: RunCheckpoint = checkpoints
        .read_latest()
        .await
        .unwrap()
        .unwrap()
        .parse()
        .unwrap();
    assert_eq!(latest.phase, EntityKind::OrderItem);
    assert!(latest.completed);
    assert_eq!(latest.committed.get(EntityKind::OrderItem), 900);
}

#[tokio::test]
async fn test_resume_after_failure_matches_uninterrupted_run() {
    let plan = fixture_config().validate().unwrap();
    let (reference, _, _) = populate(plan.clone()).await;

    let dir = tempfile::tempdir().unwrap();
    let checkpoints = Arc::new(FilesystemStore::new(dir.path()));
    // Third orders flush fails once; the retry on resume succeeds.
    let store = Arc::new(MemoryStore::retaining().fail_on_flush(EntityKind::Order, 3));

    let err = Orchestrator::new(
        plan.clone(),
        store.clone(),
        Arc::new(PerformanceMonitor::new()),
    )
    .with_checkpoints(checkpoints.clone())
    .run()
    .await
    .unwrap_err();
    assert_eq!(err.failed_phase(), Some(EntityKind::Order));
    assert_eq!(store.count(EntityKind::Order).await.unwrap(), 300);

    let report = Orchestrator::new(plan, store.clone(), Arc::new(PerformanceMonitor::new()))
        .with_checkpoints(checkpoints)
        .with_resume(true)
        .run()
        .await
        .unwrap();

    let orders = report.phase(EntityKind::Order).unwrap();
    assert_eq!(orders.resumed_from, 300);
    assert_eq!(orders.committed, 100);
    assert_eq!(report.phase(EntityKind::User).unwrap().committed, 0);
    for kind in EntityKind::ALL {
        assert_eq!(reference.rows(kind), store.rows(kind), "{kind} differs");
    }
}

#[tokio::test]
async fn test_resume_without_checkpoint_uses_store_counts() {
    let mut config = fixture_config();
    config.volumes.insert(EntityKind::Order, 0);
    config.volumes.insert(EntityKind::OrderItem, 0);
    let (store, _, _) = populate(config.validate().unwrap()).await;

    let report = Orchestrator::new(
        fixture_config().validate().unwrap(),
        store.clone(),
        Arc::new(PerformanceMonitor::new()),
    )
    .with_resume(true)
    .run()
    .await
    .unwrap();

    assert_eq!(report.phase(EntityKind::User).unwrap().committed, 0);
    assert_eq!(report.phase(EntityKind::Order).unwrap().committed, 400);
    assert_eq!(store.count(EntityKind::OrderItem).await.unwrap(), 900);
}

#[tokio::test]
async fn test_checkpoint_that_disagrees_with_store_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let checkpoints = Arc::new(FilesystemStore::new(dir.path()));
    let mut committed = CommittedCounts::new();
    committed.advance(EntityKind::Department, 5);
    let checkpoint = RunCheckpoint {
        seed: 42,
        phase: EntityKind::Department,
        completed: true,
        committed,
        next_index: BTreeMap::from([(EntityKind::Department, 5)]),
    };
    checkpoints
        .store_checkpoint(&CheckpointFile::new(&checkpoint, "departments_done").unwrap())
        .await
        .unwrap();

    let store = Arc::new(MemoryStore::new());
    let err = Orchestrator::new(
        fixture_config().validate().unwrap(),
        store.clone(),
        Arc::new(PerformanceMonitor::new()),
    )
    .with_checkpoints(checkpoints)
    .with_resume(true)
    .run()
    .await
    .unwrap_err();

    assert!(matches!(
        err,
        PopulateError::CheckpointMismatch {
            kind: EntityKind::Department,
            checkpoint: 5,
            store: 0,
        }
    ));
    assert_eq!(store.count(EntityKind::Department).await.unwrap(), 0);
}

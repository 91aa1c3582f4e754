//! Configuration errors and store failures.

use perf_monitor::PerformanceMonitor;
use seed_core::{ConfigError, EntityKind, SeedConfig};
use seed_populate::{EntityStore, MemoryStore, Orchestrator, PopulateError};
use std::sync::Arc;

use crate::fixture_config;

#[tokio::test]
async fn test_zero_batch_size_fails_before_generation() {
    let mut config = fixture_config();
    config.batch_sizes.insert(EntityKind::Product, 0);
    let store = Arc::new(MemoryStore::new());

    let err = Orchestrator::from_config(&config, store.clone(), Arc::new(PerformanceMonitor::new()))
        .err()
        .unwrap();
    assert!(matches!(
        err,
        PopulateError::Config(ConfigError::MisconfiguredVolume {
            kind: EntityKind::Product,
            ..
        })
    ));
    assert_eq!(store.statistics().await.unwrap().total_rows(), 0);
}

#[tokio::test]
async fn test_negative_volume_is_rejected() {
    let config = SeedConfig::from_yaml("volumes:\n  orders: -1\n").unwrap();
    assert!(Orchestrator::from_config(
        &config,
        Arc::new(MemoryStore::new()),
        Arc::new(PerformanceMonitor::new())
    )
    .is_err());
}

#[tokio::test]
async fn test_store_failure_aborts_run_and_keeps_completed_phases() {
    let store = Arc::new(MemoryStore::new().fail_on_flush(EntityKind::Product, 2));
    let monitor = Arc::new(PerformanceMonitor::new());

    let err = Orchestrator::new(
        fixture_config().validate().unwrap(),
        store.clone(),
        monitor.clone(),
    )
    .run()
    .await
    .unwrap_err();

    let PopulateError::PhaseFailed {
        kind, committed, ..
    } = &err
    else {
        panic!("expected phase failure");
    };
    assert_eq!(*kind, EntityKind::Product);
    assert_eq!(committed.get(EntityKind::User), 250);
    assert_eq!(committed.get(EntityKind::Product), 200);
    assert!(err.to_string().contains("injected failure"));

    // Earlier phases are intact; nothing after the failure was attempted.
    assert_eq!(store.count(EntityKind::User).await.unwrap(), 250);
    assert_eq!(store.count(EntityKind::Order).await.unwrap(), 0);

    let summary = monitor.summary();
    let names: Vec<&str> = summary.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(summary.len(), 4);
    assert!(names.contains(&"populate.users"));
    assert!(!names.contains(&"populate.orders"));
    assert!(monitor
        .result("populate.products")
        .unwrap()
        .description
        .contains("failed"));
    assert!(!monitor.is_active("populate.products"));
}

#[tokio::test]
async fn test_batch_spans_name_each_flush() {
    let mut config = fixture_config();
    config.batch_spans = true;
    let monitor = Arc::new(PerformanceMonitor::new());

    Orchestrator::from_config(&config, Arc::new(MemoryStore::new()), monitor.clone())
        .unwrap()
        .run()
        .await
        .unwrap();

    assert!(monitor.result("users.batch.1").is_some());
    assert!(monitor.result("users.batch.3").is_some());
    assert!(monitor.result("users.batch.4").is_none());
    assert!(monitor.result("populate.users").is_some());
}

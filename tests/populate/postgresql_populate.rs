//! PostgreSQL populate integration test.
//!
//! Runs only when `POSTGRESQL_CONNECTION_STRING` points at a disposable
//! database; the tables are dropped and recreated.

use perf_monitor::PerformanceMonitor;
use seed_core::{EntityKind, Record};
use seed_generator::RecordGenerator;
use seed_populate::{EntityStore, Orchestrator};
use seed_populate_postgresql::PostgreSQLStore;
use std::sync::Arc;

use crate::{fixture_config, plan_from_yaml};

/// Both tests drop and recreate the same tables.
static DATABASE: tokio::sync::Mutex<()> = tokio::sync::Mutex::const_new(());

#[tokio::test]
async fn test_postgresql_populate_small_scale() -> Result<(), Box<dyn std::error::Error>> {
    let Ok(connection_string) = std::env::var("POSTGRESQL_CONNECTION_STRING") else {
        eprintln!("POSTGRESQL_CONNECTION_STRING not set, skipping");
        return Ok(());
    };
    let _database = DATABASE.lock().await;

    tracing_subscriber::fmt()
        .with_env_filter(seedbench::DEFAULT_LOG_FILTER)
        .try_init()
        .ok();

    let store = Arc::new(PostgreSQLStore::connect(&connection_string).await?);
    store.recreate_schema().await?;

    let plan = fixture_config().validate()?;
    let report = Orchestrator::new(plan.clone(), store.clone(), Arc::new(PerformanceMonitor::new()))
        .run()
        .await?;

    for phase in plan.phases() {
        assert_eq!(store.count(phase.kind).await?, phase.volume);
    }
    assert_eq!(report.total_skipped(), 0);

    let statistics = store.statistics().await?;
    let products = statistics.table(EntityKind::Product).unwrap();
    assert_eq!(products.blob_bytes, 10 * 10 * 1024);
    assert!(products.total_bytes.unwrap() > products.blob_bytes);

    store.drop_schema().await?;
    Ok(())
}

/// A rolled-back batch still consumes sequence values; a resumed run must
/// keep ids contiguous so sampled references stay within committed rows.
#[tokio::test]
async fn test_postgresql_resume_after_rolled_back_batch() -> Result<(), Box<dyn std::error::Error>>
{
    let Ok(connection_string) = std::env::var("POSTGRESQL_CONNECTION_STRING") else {
        eprintln!("POSTGRESQL_CONNECTION_STRING not set, skipping");
        return Ok(());
    };
    let _database = DATABASE.lock().await;

    let store = Arc::new(PostgreSQLStore::connect(&connection_string).await?);
    store.recreate_schema().await?;

    let first = plan_from_yaml(
        "volumes:\n  departments: 2\n  categories: 2\n  users: 100\n  products: 10\n  orders: 0\n  order_items: 0\n",
    );
    Orchestrator::new(first, store.clone(), Arc::new(PerformanceMonitor::new()))
        .run()
        .await?;

    // Burn 50 user ids with a batch the foreign key check rejects.
    let mut rejected = RecordGenerator::new(42).draft_range(EntityKind::User, 100..150);
    for record in &mut rejected {
        if let Record::User(user) = record {
            user.department_id = Some(999);
        }
    }
    assert!(store.bulk_insert(EntityKind::User, &rejected).await.is_err());
    assert_eq!(store.count(EntityKind::User).await?, 100);

    let resumed = plan_from_yaml(
        "volumes:\n  departments: 2\n  categories: 2\n  users: 150\n  products: 10\n  orders: 200\n  order_items: 0\n",
    );
    let report = Orchestrator::new(resumed, store.clone(), Arc::new(PerformanceMonitor::new()))
        .with_resume(true)
        .run()
        .await?;

    assert_eq!(store.count(EntityKind::User).await?, 150);
    assert_eq!(report.committed.get(EntityKind::Order), 200);
    assert_eq!(report.total_skipped(), 0);

    store.drop_schema().await?;
    Ok(())
}

//! Output visible under the binary's default log filter.

use checkpoint::{CheckpointFile, CheckpointStore, FilesystemStore};
use perf_monitor::PerformanceMonitor;
use seed_core::EntityKind;
use seed_populate::{CommittedCounts, RunCheckpoint};
use seedbench::DEFAULT_LOG_FILTER;
use std::collections::BTreeMap;

use crate::{capture_filtered_logs, plan_from_yaml, populate};

#[test]
fn test_default_filter_keeps_performance_summary_and_span_warnings() {
    let (logs, _guard) = capture_filtered_logs(DEFAULT_LOG_FILTER);

    let monitor = PerformanceMonitor::new();
    monitor.start("populate.users", "Populate 10 users");
    monitor.stop("populate.users", "Populate 10 users");
    assert!(monitor.stop("never_started", "").is_none());
    monitor.log_summary();

    let output = logs.contents();
    assert!(output.contains("Span 'never_started' stopped without a matching start"));
    assert!(output.contains("Performance summary (1 spans, slowest first):"));
    assert!(output.contains("populate.users"));
}

#[tokio::test]
async fn test_default_filter_keeps_progress_and_checkpoint_lines() {
    let (logs, _guard) = capture_filtered_logs(DEFAULT_LOG_FILTER);

    let plan = plan_from_yaml(
        "volumes:\n  departments: 2\n  categories: 2\n  users: 20\n  products: 5\n  orders: 5\n  order_items: 5\n",
    );
    let (_, monitor, _) = populate(plan).await;
    monitor.log_summary();

    let dir = tempfile::tempdir().unwrap();
    let checkpoint = RunCheckpoint {
        seed: 42,
        phase: EntityKind::Department,
        completed: true,
        committed: CommittedCounts::new(),
        next_index: BTreeMap::new(),
    };
    FilesystemStore::new(dir.path())
        .store_checkpoint(&CheckpointFile::new(&checkpoint, "departments_done").unwrap())
        .await
        .unwrap();

    let output = logs.contents();
    assert!(output.contains("Users: 20 of 20 created"));
    assert!(output.contains("populate.order_items"));
    assert!(output.contains("Stored checkpoint to"));
}

//! Batch boundaries, progress lines and bounded buffering.

use seed_core::EntityKind;

use crate::{capture_logs, fixture_config, plan_from_yaml, populate};

const USERS_250: &str = r#"
volumes:
  departments: 4
  categories: 4
  users: 250
  products: 10
  orders: 20
  order_items: 30
batch_sizes:
  users: 100
progress_interval_rows: 100
"#;

#[tokio::test]
async fn test_partial_final_batch_and_progress_lines() {
    let (logs, _guard) = capture_logs();
    let (store, _, report) = populate(plan_from_yaml(USERS_250)).await;

    assert_eq!(store.batch_sizes(EntityKind::User), vec![100, 100, 50]);
    assert_eq!(report.phase(EntityKind::User).unwrap().batches, 3);

    let output = logs.contents();
    assert!(output.contains("Users: 100 of 250 created"), "{output}");
    assert!(output.contains("Users: 200 of 250 created"), "{output}");
    assert_eq!(output.matches("Users: 250 of 250 created").count(), 1);
}

#[tokio::test]
async fn test_zero_interval_logs_only_completion() {
    let yaml = USERS_250.replace("progress_interval_rows: 100", "progress_interval_rows: 0");
    let (logs, _guard) = capture_logs();
    populate(plan_from_yaml(&yaml)).await;

    let output = logs.contents();
    assert!(!output.contains("Users: 100 of 250 created"));
    assert!(output.contains("Users: 250 of 250 created"));
    assert!(output.contains("Order items: 30 of 30 created"));
}

#[tokio::test]
async fn test_volume_equal_to_batch_size_is_one_batch() {
    let yaml = USERS_250.replace("users: 250", "users: 100");
    let (store, _, _) = populate(plan_from_yaml(&yaml)).await;
    assert_eq!(store.batch_sizes(EntityKind::User), vec![100]);
}

#[tokio::test]
async fn test_zero_volume_phase_writes_nothing() {
    let yaml = USERS_250.replace("order_items: 30", "order_items: 0");
    let (store, _, report) = populate(plan_from_yaml(&yaml)).await;

    assert!(store.batch_sizes(EntityKind::OrderItem).is_empty());
    assert_eq!(report.committed.get(EntityKind::OrderItem), 0);
    assert_eq!(report.phase(EntityKind::OrderItem).unwrap().batches, 0);
}

#[tokio::test]
async fn test_buffer_never_exceeds_batch_size() {
    let plan = fixture_config().validate().unwrap();
    let (_, _, report) = populate(plan.clone()).await;

    for phase in &report.phases {
        let batch_size = plan.phase(phase.kind).batch_size;
        assert!(
            phase.peak_buffered <= batch_size,
            "{} buffered {} with batch size {}",
            phase.kind,
            phase.peak_buffered,
            batch_size
        );
    }
}

#[tokio::test]
async fn test_counts_match_configured_volumes() {
    let plan = fixture_config().validate().unwrap();
    let (store, _, report) = populate(plan.clone()).await;

    assert_eq!(report.total_skipped(), 0);
    for phase in plan.phases() {
        assert_eq!(store.rows(phase.kind).len() as u64, phase.volume);
        assert_eq!(report.committed.get(phase.kind), phase.volume);
        assert_eq!(
            store.batch_sizes(phase.kind).len() as u64,
            phase.batch_count()
        );
    }
}

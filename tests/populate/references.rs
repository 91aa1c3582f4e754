//! Referential validity and skip accounting.

use checkpoint::{CheckpointFile, CheckpointStore, FilesystemStore};
use perf_monitor::PerformanceMonitor;
use seed_core::{EntityKind, Order, Record};
use seed_populate::{CommittedCounts, EntityStore, MemoryStore, Orchestrator, RunCheckpoint};
use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;

use crate::{capture_logs, fixture_config, plan_from_yaml, populate};

#[tokio::test]
async fn test_every_foreign_key_points_at_a_committed_row() {
    let (store, _, _) = populate(fixture_config().validate().unwrap()).await;

    for kind in EntityKind::ALL {
        for (_, record) in store.rows(kind) {
            for (parent, id) in record.foreign_keys() {
                let parent_rows = store.count(parent).await.unwrap();
                match id {
                    Some(id) => assert!(
                        (1..=parent_rows).contains(&id),
                        "{kind} {} references {parent} {id} of {parent_rows}",
                        record.index()
                    ),
                    None => assert_eq!(kind, EntityKind::User, "only users may lack a parent"),
                }
            }
        }
    }
}

#[tokio::test]
async fn test_order_numbers_are_unique() {
    let (store, _, _) = populate(fixture_config().validate().unwrap()).await;

    let numbers: HashSet<String> = store
        .rows(EntityKind::Order)
        .into_iter()
        .filter_map(|(_, record)| match record {
            Record::Order(order) => Some(order.order_number),
            _ => None,
        })
        .collect();
    assert_eq!(numbers.len(), 400);
}

#[tokio::test]
async fn test_users_without_departments_get_null() {
    let yaml = r#"
volumes:
  departments: 0
  categories: 1
  users: 10
  products: 1
  orders: 1
  order_items: 1
"#;
    let (store, _, report) = populate(plan_from_yaml(yaml)).await;

    assert_eq!(report.committed.get(EntityKind::User), 10);
    for (_, record) in store.rows(EntityKind::User) {
        let Record::User(user) = record else {
            panic!("expected user");
        };
        assert_eq!(user.department_id, None);
    }
}

#[tokio::test]
async fn test_children_of_an_empty_parent_are_all_skipped() {
    let yaml = r#"
volumes:
  departments: 1
  categories: 1
  users: 0
  products: 5
  orders: 40
  order_items: 10
"#;
    let (store, _, report) = populate(plan_from_yaml(yaml)).await;

    let orders = report.phase(EntityKind::Order).unwrap();
    assert_eq!(orders.skipped, 40);
    assert_eq!(orders.committed, 0);
    assert!(store.batch_sizes(EntityKind::Order).is_empty());
    // No orders means no order items either.
    assert_eq!(report.phase(EntityKind::OrderItem).unwrap().skipped, 10);
}

/// Users were configured for 100 but only 50 are committed; orders sample
/// within the configured user range and drop what does not exist.
#[tokio::test]
async fn test_orders_referencing_missing_users_are_skipped_and_counted() {
    let store = Arc::new(MemoryStore::retaining());
    let seeded = plan_from_yaml(
        "volumes:\n  departments: 2\n  categories: 2\n  users: 50\n  products: 20\n  orders: 0\n  order_items: 0\n",
    );
    Orchestrator::new(seeded, store.clone(), Arc::new(PerformanceMonitor::new()))
        .run()
        .await
        .unwrap();

    // The users phase is recorded as done at logical index 100.
    let dir = tempfile::tempdir().unwrap();
    let checkpoints = Arc::new(FilesystemStore::new(dir.path()));
    let mut committed = CommittedCounts::new();
    committed.advance(EntityKind::Department, 2);
    committed.advance(EntityKind::Category, 2);
    committed.advance(EntityKind::User, 50);
    committed.advance(EntityKind::Product, 20);
    let checkpoint = RunCheckpoint {
        seed: 42,
        phase: EntityKind::Product,
        completed: true,
        committed,
        next_index: BTreeMap::from([
            (EntityKind::Department, 2),
            (EntityKind::Category, 2),
            (EntityKind::User, 100),
            (EntityKind::Product, 20),
        ]),
    };
    checkpoints
        .store_checkpoint(&CheckpointFile::new(&checkpoint, "products_done").unwrap())
        .await
        .unwrap();

    let plan = plan_from_yaml(
        r#"
volumes:
  departments: 2
  categories: 2
  users: 100
  products: 20
  orders: 200
  order_items: 0
reference_domain: configured
"#,
    );
    let (logs, _guard) = capture_logs();
    let report = Orchestrator::new(plan, store.clone(), Arc::new(PerformanceMonitor::new()))
        .with_checkpoints(checkpoints)
        .with_resume(true)
        .run()
        .await
        .unwrap();

    let orders = report.phase(EntityKind::Order).unwrap();
    assert!(orders.skipped > 0);
    assert!(orders.committed > 0);
    assert_eq!(orders.skipped + orders.committed, 200);
    assert_eq!(
        store.count(EntityKind::Order).await.unwrap(),
        orders.committed
    );
    assert_eq!(store.count(EntityKind::User).await.unwrap(), 50);

    for (id, record) in store.rows(EntityKind::Order) {
        let Record::Order(order) = record else {
            panic!("expected order");
        };
        assert!(order.user_id.unwrap() <= 50);
        assert_eq!(order.order_number, Order::number_for_id(id));
    }

    let output = logs.contents();
    assert!(output.contains("Users: 50 of 100 created (already complete)"));
    assert!(output.contains(&format!(
        "Orders: skipped {} of 200 records with unresolved references",
        orders.skipped
    )));
    drop(_guard);

    // Resuming from store counts alone re-drafts logical indices whose
    // earlier drafts were skipped; stored order numbers must stay unique.
    let extended = plan_from_yaml(
        r#"
volumes:
  departments: 2
  categories: 2
  users: 100
  products: 20
  orders: 300
  order_items: 0
"#,
    );
    Orchestrator::new(extended, store.clone(), Arc::new(PerformanceMonitor::new()))
        .with_resume(true)
        .run()
        .await
        .unwrap();

    let rows = store.rows(EntityKind::Order);
    assert!(rows.len() as u64 > orders.committed);
    let mut numbers = HashSet::new();
    for (id, record) in rows {
        let Record::Order(order) = record else {
            panic!("expected order");
        };
        assert_eq!(order.order_number, Order::number_for_id(id));
        assert!(numbers.insert(order.order_number));
    }
}

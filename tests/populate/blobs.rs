//! Blob placement and accounting.

use seed_core::{EntityKind, Record};
use seed_populate::EntityStore;

use crate::{fixture_config, populate};

#[tokio::test]
async fn test_exactly_one_percent_of_products_carry_blobs() {
    let (store, _, _) = populate(fixture_config().validate().unwrap()).await;

    let mut with_blob = Vec::new();
    for (id, record) in store.rows(EntityKind::Product) {
        let Record::Product(product) = record else {
            panic!("expected product");
        };
        if let Some(blob) = product.image_blob {
            assert_eq!(blob.len(), 10 * 1024);
            with_blob.push(id);
        }
    }
    // 1000 products at 1%: the first ten logical indices, ids 1..=10.
    assert_eq!(with_blob, (1..=10).collect::<Vec<u64>>());

    let statistics = store.statistics().await.unwrap();
    assert_eq!(
        statistics.table(EntityKind::Product).unwrap().blob_bytes,
        10 * 10 * 1024
    );
}

#[tokio::test]
async fn test_order_blobs_follow_fraction() {
    let (store, _, _) = populate(fixture_config().validate().unwrap()).await;

    // 400 orders at 0.5%: two invoices.
    let blobs: Vec<usize> = store
        .rows(EntityKind::Order)
        .into_iter()
        .filter_map(|(_, record)| match record {
            Record::Order(order) => order.invoice_blob.map(|b| b.len()),
            _ => None,
        })
        .collect();
    assert_eq!(blobs, vec![2048, 2048]);
}

#[tokio::test]
async fn test_blobs_are_not_shared_between_rows() {
    let (store, _, _) = populate(fixture_config().validate().unwrap()).await;

    let payloads: Vec<Vec<u8>> = store
        .rows(EntityKind::Product)
        .into_iter()
        .filter_map(|(_, record)| match record {
            Record::Product(product) => product.image_blob,
            _ => None,
        })
        .collect();
    assert_eq!(payloads.len(), 10);
    assert_ne!(payloads[0], payloads[1]);
}

//! Main record generator.

use rand::rngs::StdRng;
use seed_core::{
    BlobPlan, Category, Department, EntityKind, Order, OrderItem, OrderStatus, Product, Record,
    RunPlan, User,
};
use std::collections::BTreeMap;
use std::ops::Range;

use crate::generators::timestamp::{RANGE_END, RANGE_START};
use crate::generators::{
    blob, index_rng, numeric, timestamp, vocabulary, REFERENCE_STREAM, VALUE_STREAM,
};

/// Deterministic record generator.
///
/// Holds only the seed and the blob plans, so it is cheap to clone into
/// worker tasks. Drafted records have every foreign key set to `None`; the
/// resolver fills them in before the batch is flushed.
#[derive(Debug, Clone)]
pub struct RecordGenerator {
    /// Seed governing all pseudo-random draws
    seed: u64,
    /// Blob settings for blob-bearing kinds
    blobs: BTreeMap<EntityKind, BlobPlan>,
}

impl RecordGenerator {
    /// Create a generator without any blob payloads.
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            blobs: BTreeMap::new(),
        }
    }

    /// Create a generator from a validated run plan.
    pub fn from_plan(plan: &RunPlan) -> Self {
        let blobs = plan
            .phases()
            .iter()
            .filter_map(|phase| phase.blob.map(|blob| (phase.kind, blob)))
            .collect();
        Self {
            seed: plan.seed,
            blobs,
        }
    }

    /// Attach blob settings to one entity kind.
    pub fn with_blob(mut self, kind: EntityKind, blob: BlobPlan) -> Self {
        self.blobs.insert(kind, blob);
        self
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Random stream reserved for foreign key sampling of one record.
    pub fn reference_rng(&self, kind: EntityKind, index: u64) -> StdRng {
        index_rng(self.seed, kind, index, REFERENCE_STREAM)
    }

    /// Draft the record at `index` for `kind`.
    pub fn draft(&self, kind: EntityKind, index: u64) -> Record {
        let mut rng = index_rng(self.seed, kind, index, VALUE_STREAM);

        match kind {
            EntityKind::Department => {
                let name = vocabulary::department_name(index);
                Record::Department(Department {
                    index,
                    description: vocabulary::description(&mut rng, "department"),
                    budget: numeric::generate_money(&mut rng, 10_000_000, 500_000_000),
                    name,
                })
            }
            EntityKind::Category => {
                let name = vocabulary::category_name(index);
                Record::Category(Category {
                    index,
                    description: vocabulary::description(&mut rng, &name.to_lowercase()),
                    name,
                })
            }
            EntityKind::User => Record::User(User {
                index,
                name: vocabulary::person_name(index),
                email: vocabulary::email(index),
                created_at: timestamp::generate_timestamp_range(&mut rng, RANGE_START, RANGE_END),
                department_id: None,
            }),
            EntityKind::Product => {
                let name = vocabulary::product_name(index);
                let description = vocabulary::description(&mut rng, "product");
                let price = numeric::generate_money(&mut rng, 1_000, 100_000);
                let stock_quantity = numeric::generate_int_range(&mut rng, 0, 999);
                // Drawn last so enabling blobs never shifts the other fields.
                let image_blob = self.payload(kind, index, &mut rng);
                Record::Product(Product {
                    index,
                    name,
                    description,
                    price,
                    stock_quantity,
                    category_id: None,
                    image_blob,
                })
            }
            EntityKind::Order => {
                let order_date =
                    timestamp::generate_timestamp_range(&mut rng, RANGE_START, RANGE_END);
                let total_amount = numeric::generate_money(&mut rng, 2_000, 500_000);
                let invoice_blob = self.payload(kind, index, &mut rng);
                Record::Order(Order {
                    index,
                    order_number: Order::number_for_id(index + 1),
                    order_date,
                    status: order_status(index),
                    total_amount,
                    user_id: None,
                    invoice_blob,
                })
            }
            EntityKind::OrderItem => Record::OrderItem(OrderItem {
                index,
                order_id: None,
                product_id: None,
                quantity: numeric::generate_int_range(&mut rng, 1, 10),
                unit_price: numeric::generate_money(&mut rng, 500, 50_000),
            }),
        }
    }

    /// Draft every record in `range`, in index order.
    pub fn draft_range(&self, kind: EntityKind, range: Range<u64>) -> Vec<Record> {
        range.map(|index| self.draft(kind, index)).collect()
    }

    /// Lazily draft `count` records starting at `start`.
    pub fn records(&self, kind: EntityKind, start: u64, count: u64) -> RecordIterator<'_> {
        RecordIterator {
            generator: self,
            kind,
            next: start,
            end: start.saturating_add(count),
        }
    }

    fn payload(&self, kind: EntityKind, index: u64, rng: &mut StdRng) -> Option<Vec<u8>> {
        let blob = self.blobs.get(&kind)?;
        if !blob.applies_to(index) {
            return None;
        }
        Some(blob::generate_payload(rng, blob.size_bytes))
    }
}

/// Status chosen by `index mod |statuses|` for an even spread.
pub fn order_status(index: u64) -> OrderStatus {
    OrderStatus::ALL[(index % OrderStatus::ALL.len() as u64) as usize]
}

/// Iterator that lazily drafts records.
pub struct RecordIterator<'a> {
    generator: &'a RecordGenerator,
    kind: EntityKind,
    next: u64,
    end: u64,
}

impl Iterator for RecordIterator<'_> {
    type Item = Record;

    fn next(&mut self) -> Option<Self::Item> {
        if self.next >= self.end {
            return None;
        }
        let record = self.generator.draft(self.kind, self.next);
        self.next += 1;
        Some(record)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = (self.end - self.next) as usize;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for RecordIterator<'_> {}

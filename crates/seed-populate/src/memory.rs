//! In-process store.
//!
//! Behaves like the relational backend where it matters to the engine:
//! ids are assigned 1..N in insertion order, batches commit atomically, and
//! a foreign key pointing past the parent's row count rejects the whole
//! batch. Optionally keeps every row for inspection.

use async_trait::async_trait;
use seed_core::{EntityKind, FieldValue, Record};
use std::collections::BTreeMap;
use std::sync::{Mutex, PoisonError};

use crate::error::StoreError;
use crate::store::{EntityStore, StoreStatistics, TableStatistics};

#[derive(Debug, Default)]
struct MemoryTable {
    rows: u64,
    data_bytes: u64,
    blob_bytes: u64,
    flushes: u64,
    batch_sizes: Vec<usize>,
    retained: Vec<(u64, Record)>,
}

/// [`EntityStore`] kept in memory.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: Mutex<BTreeMap<EntityKind, MemoryTable>>,
    retain_rows: bool,
    fail_on: BTreeMap<EntityKind, u64>,
}

impl MemoryStore {
    /// A store that only counts rows.
    pub fn new() -> Self {
        Self::default()
    }

    /// A store that also keeps every committed row.
    pub fn retaining() -> Self {
        Self {
            retain_rows: true,
            ..Self::default()
        }
    }

    /// Reject the `flush`-th (1-based) batch written for `kind`.
    pub fn fail_on_flush(mut self, kind: EntityKind, flush: u64) -> Self {
        self.fail_on.insert(kind, flush);
        self
    }

    /// Committed rows of `kind` with their assigned ids. Empty unless the
    /// store was created with [`MemoryStore::retaining`].
    pub fn rows(&self, kind: EntityKind) -> Vec<(u64, Record)> {
        let tables = self.tables.lock().unwrap_or_else(PoisonError::into_inner);
        tables
            .get(&kind)
            .map(|table| table.retained.clone())
            .unwrap_or_default()
    }

    /// Sizes of the committed batches of `kind`, in flush order.
    pub fn batch_sizes(&self, kind: EntityKind) -> Vec<usize> {
        let tables = self.tables.lock().unwrap_or_else(PoisonError::into_inner);
        tables
            .get(&kind)
            .map(|table| table.batch_sizes.clone())
            .unwrap_or_default()
    }

    /// Drop every row and reset id assignment.
    pub fn clear(&self) {
        let mut tables = self.tables.lock().unwrap_or_else(PoisonError::into_inner);
        tables.clear();
    }

    fn check_references(
        tables: &BTreeMap<EntityKind, MemoryTable>,
        kind: EntityKind,
        records: &[Record],
    ) -> Result<(), StoreError> {
        for record in records {
            if record.kind() != kind {
                return Err(StoreError::Rejected {
                    kind,
                    message: format!("record of kind {} in {kind} batch", record.kind()),
                });
            }
            for (parent, id) in record.foreign_keys() {
                let Some(id) = id else { continue };
                let parent_rows = tables.get(&parent).map_or(0, |table| table.rows);
                if id == 0 || id > parent_rows {
                    return Err(StoreError::Rejected {
                        kind,
                        message: format!(
                            "foreign key violation: {parent} id {id} does not exist ({parent_rows} rows)"
                        ),
                    });
                }
            }
        }
        Ok(())
    }
}

/// Approximate row size: fixed widths for scalars, payload length for text
/// and bytes, plus the id column.
fn estimated_size(record: &Record) -> u64 {
    let values: usize = record
        .values()
        .iter()
        .map(|value| match value {
            FieldValue::Int32(_) => 4,
            FieldValue::Int64(_) | FieldValue::Timestamp(_) => 8,
            FieldValue::Decimal(_) => 16,
            FieldValue::Text(text) => text.len(),
            FieldValue::Bytes(bytes) => bytes.len(),
            FieldValue::Null => 0,
        })
        .sum();
    (values + 8) as u64
}

#[async_trait]
impl EntityStore for MemoryStore {
    async fn bulk_insert(&self, kind: EntityKind, records: &[Record]) -> Result<u64, StoreError> {
        let mut tables = self.tables.lock().unwrap_or_else(PoisonError::into_inner);

        let attempt = {
            let table = tables.entry(kind).or_default();
            table.flushes += 1;
            table.flushes
        };
        if self.fail_on.get(&kind) == Some(&attempt) {
            return Err(StoreError::Rejected {
                kind,
                message: format!("injected failure on flush {attempt}"),
            });
        }

        Self::check_references(&tables, kind, records)?;

        let table = tables.entry(kind).or_default();
        for record in records {
            table.rows += 1;
            table.data_bytes += estimated_size(record);
            table.blob_bytes += record.blob_len() as u64;
            if self.retain_rows {
                table.retained.push((table.rows, record.clone()));
            }
        }
        table.batch_sizes.push(records.len());
        Ok(records.len() as u64)
    }

    async fn count(&self, kind: EntityKind) -> Result<u64, StoreError> {
        let tables = self.tables.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(tables.get(&kind).map_or(0, |table| table.rows))
    }

    async fn statistics(&self) -> Result<StoreStatistics, StoreError> {
        let tables = self.tables.lock().unwrap_or_else(PoisonError::into_inner);
        let tables = EntityKind::ALL
            .iter()
            .map(|kind| {
                let table = tables.get(kind);
                TableStatistics {
                    kind: *kind,
                    rows: table.map_or(0, |t| t.rows),
                    total_bytes: Some(table.map_or(0, |t| t.data_bytes)),
                    blob_bytes: table.map_or(0, |t| t.blob_bytes),
                }
            })
            .collect();
        Ok(StoreStatistics { tables })
    }
}

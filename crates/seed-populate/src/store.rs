//! The persistence boundary.

use async_trait::async_trait;
use seed_core::{EntityKind, Record};
use serde::Serialize;

use crate::error::StoreError;

/// Bulk-write and count interface the engine writes through.
///
/// Implementations must commit a batch atomically and assign auto-increment
/// ids in insertion order: row `i` of a batch gets id `prior_count + i + 1`.
#[async_trait]
pub trait EntityStore: Send + Sync {
    /// Insert `records` (all of kind `kind`, FKs resolved) and return the
    /// number of rows committed.
    async fn bulk_insert(&self, kind: EntityKind, records: &[Record]) -> Result<u64, StoreError>;

    /// Number of committed rows of `kind`.
    async fn count(&self, kind: EntityKind) -> Result<u64, StoreError>;

    /// Row counts and storage sizes per table.
    async fn statistics(&self) -> Result<StoreStatistics, StoreError>;

    /// Make the next id assigned to `kind` equal `count(kind) + 1`.
    ///
    /// Called before a resumed run. Backends whose id counters survive a
    /// rolled-back batch must rewind them here, and fail if the stored ids
    /// are no longer contiguous.
    async fn realign_ids(&self, _kind: EntityKind) -> Result<(), StoreError> {
        Ok(())
    }
}

/// Storage statistics for one table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableStatistics {
    pub kind: EntityKind,
    pub rows: u64,
    /// Total on-disk (or in-memory) size, when the backend can tell.
    pub total_bytes: Option<u64>,
    /// Bytes held in the blob column.
    pub blob_bytes: u64,
}

/// Storage statistics for all tables.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StoreStatistics {
    pub tables: Vec<TableStatistics>,
}

impl StoreStatistics {
    pub fn table(&self, kind: EntityKind) -> Option<&TableStatistics> {
        self.tables.iter().find(|t| t.kind == kind)
    }

    pub fn total_rows(&self) -> u64 {
        self.tables.iter().map(|t| t.rows).sum()
    }

    pub fn total_blob_bytes(&self) -> u64 {
        self.tables.iter().map(|t| t.blob_bytes).sum()
    }

    /// Log the report at info level.
    pub fn log(&self) {
        tracing::info!("Database statistics:");
        for table in &self.tables {
            match table.total_bytes {
                Some(bytes) => tracing::info!(
                    "  {}: {} rows, {} total, {} in blobs",
                    table.kind,
                    table.rows,
                    format_bytes(bytes),
                    format_bytes(table.blob_bytes)
                ),
                None => tracing::info!(
                    "  {}: {} rows, {} in blobs",
                    table.kind,
                    table.rows,
                    format_bytes(table.blob_bytes)
                ),
            }
        }
        tracing::info!(
            "  total: {} rows, {} in blobs",
            self.total_rows(),
            format_bytes(self.total_blob_bytes())
        );
    }
}

/// Human-readable byte count.
pub fn format_bytes(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["B", "KiB", "MiB", "GiB"];
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{bytes} B")
    } else {
        format!("{value:.1} {}", UNITS[unit])
    }
}

//! Batch buffering and flushing.

use perf_monitor::PerformanceMonitor;
use seed_core::{EntityKind, Record};
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tracing::debug;

use crate::error::StoreError;
use crate::resolver::CommittedCounts;
use crate::store::EntityStore;

/// Tracks how many records are buffered in memory at once.
#[derive(Debug, Clone, Default)]
pub struct BufferGauge {
    inner: Arc<GaugeState>,
}

#[derive(Debug, Default)]
struct GaugeState {
    live: AtomicUsize,
    peak: AtomicUsize,
}

impl BufferGauge {
    pub fn new() -> Self {
        Self::default()
    }

    fn acquire(&self, rows: usize) {
        let live = self.inner.live.fetch_add(rows, Ordering::SeqCst) + rows;
        self.inner.peak.fetch_max(live, Ordering::SeqCst);
    }

    fn release(&self, rows: usize) {
        self.inner.live.fetch_sub(rows, Ordering::SeqCst);
    }

    /// Records currently held by live buffers.
    pub fn live(&self) -> usize {
        self.inner.live.load(Ordering::SeqCst)
    }

    /// Highest number of records ever held at once.
    pub fn peak(&self) -> usize {
        self.inner.peak.load(Ordering::SeqCst)
    }

    /// Reset the peak to the current live count.
    pub fn reset_peak(&self) {
        self.inner.peak.store(self.live(), Ordering::SeqCst);
    }
}

/// Records of one kind waiting to be flushed.
///
/// The reservation is returned to the gauge when the buffer is dropped,
/// whether it was flushed or abandoned on an error path.
#[derive(Debug)]
pub struct BatchBuffer {
    kind: EntityKind,
    records: Vec<Record>,
    reserved: usize,
    gauge: BufferGauge,
}

impl BatchBuffer {
    /// Reserve room for `capacity` records.
    pub fn reserve(kind: EntityKind, capacity: usize, gauge: &BufferGauge) -> Self {
        gauge.acquire(capacity);
        Self {
            kind,
            records: Vec::with_capacity(capacity),
            reserved: capacity,
            gauge: gauge.clone(),
        }
    }

    pub fn kind(&self) -> EntityKind {
        self.kind
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn records_mut(&mut self) -> &mut Vec<Record> {
        &mut self.records
    }

    /// Append drafted records. Never grows beyond the reservation.
    pub fn extend(&mut self, records: impl IntoIterator<Item = Record>) {
        let room = self.reserved.saturating_sub(self.records.len());
        self.records.extend(records.into_iter().take(room));
    }
}

impl Drop for BatchBuffer {
    fn drop(&mut self) {
        self.gauge.release(self.reserved);
    }
}

/// Result of one successful flush.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlushOutcome {
    /// Rows committed by this flush
    pub rows: u64,
    /// Committed rows of the kind after this flush
    pub committed_total: u64,
}

/// Flushes batches through an [`EntityStore`] and keeps committed counts.
pub struct BatchWriter {
    store: Arc<dyn EntityStore>,
    monitor: Arc<PerformanceMonitor>,
    batch_spans: bool,
    committed: CommittedCounts,
    batches: BTreeMap<EntityKind, u64>,
}

impl BatchWriter {
    pub fn new(
        store: Arc<dyn EntityStore>,
        monitor: Arc<PerformanceMonitor>,
        committed: CommittedCounts,
    ) -> Self {
        Self {
            store,
            monitor,
            batch_spans: false,
            committed,
            batches: BTreeMap::new(),
        }
    }

    /// Open a `<kind>.batch.<n>` span around every flush.
    pub fn with_batch_spans(mut self, enabled: bool) -> Self {
        self.batch_spans = enabled;
        self
    }

    pub fn committed(&self) -> &CommittedCounts {
        &self.committed
    }

    /// Number of non-empty batches of `kind` flushed by this writer.
    pub fn batches(&self, kind: EntityKind) -> u64 {
        self.batches.get(&kind).copied().unwrap_or(0)
    }

    /// Write `batch` atomically and release its buffer.
    ///
    /// An empty batch is a no-op. Committed counts advance only after the
    /// store confirms every row. Row `i` of the batch is stored under id
    /// `committed + i + 1`, and id-derived fields are bound to it first.
    pub async fn flush_batch(
        &mut self,
        mut batch: BatchBuffer,
    ) -> Result<FlushOutcome, StoreError> {
        let kind = batch.kind();
        if batch.is_empty() {
            return Ok(FlushOutcome {
                rows: 0,
                committed_total: self.committed.get(kind),
            });
        }

        let first_id = self.committed.get(kind) + 1;
        for (offset, record) in batch.records_mut().iter_mut().enumerate() {
            record.bind_id(first_id + offset as u64);
        }

        let expected = batch.len() as u64;
        let sequence = self.batches(kind) + 1;
        let rows = if self.batch_spans {
            let span = format!("{kind}.batch.{sequence}");
            let description = format!("Insert {expected} {kind} rows");
            self.monitor
                .measure_async(&span, &description, self.store.bulk_insert(kind, batch.records()))
                .await?
        } else {
            self.store.bulk_insert(kind, batch.records()).await?
        };
        drop(batch);

        if rows != expected {
            return Err(StoreError::PartialCommit {
                kind,
                expected,
                committed: rows,
            });
        }

        self.batches.insert(kind, sequence);
        let committed_total = self.committed.advance(kind, rows);
        debug!(
            "Flushed {} batch {} ({} rows, {} committed)",
            kind, sequence, rows, committed_total
        );
        Ok(FlushOutcome {
            rows,
            committed_total,
        })
    }
}

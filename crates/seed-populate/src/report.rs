//! Run and phase metrics.

use perf_monitor::SpanResult;
use seed_core::EntityKind;
use serde::Serialize;
use std::time::Duration;
use tracing::{info, warn};

use crate::resolver::CommittedCounts;

/// Metrics from one phase.
#[derive(Debug, Clone, Serialize)]
pub struct PhaseReport {
    pub kind: EntityKind,
    /// Configured volume.
    pub target: u64,
    /// Logical index the phase started from (non-zero when resumed).
    pub resumed_from: u64,
    /// Records drafted by this run.
    pub generated: u64,
    /// Rows committed by this run.
    pub committed: u64,
    /// Records dropped because a required reference could not be resolved.
    pub skipped: u64,
    /// Number of non-empty flushes.
    pub batches: u64,
    /// Largest number of records buffered at once.
    pub peak_buffered: usize,
    #[serde(serialize_with = "serialize_millis")]
    pub generation_duration: Duration,
    #[serde(serialize_with = "serialize_millis")]
    pub insert_duration: Duration,
    #[serde(serialize_with = "serialize_millis")]
    pub total_duration: Duration,
}

impl PhaseReport {
    pub fn new(kind: EntityKind, target: u64, resumed_from: u64) -> Self {
        Self {
            kind,
            target,
            resumed_from,
            generated: 0,
            committed: 0,
            skipped: 0,
            batches: 0,
            peak_buffered: 0,
            generation_duration: Duration::ZERO,
            insert_duration: Duration::ZERO,
            total_duration: Duration::ZERO,
        }
    }

    /// Committed rows per second of wall-clock phase time.
    pub fn rows_per_second(&self) -> f64 {
        if self.total_duration.as_secs_f64() > 0.0 {
            self.committed as f64 / self.total_duration.as_secs_f64()
        } else {
            0.0
        }
    }
}

/// Metrics from a whole run.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub seed: u64,
    /// Completed phases, in the order they ran.
    pub phases: Vec<PhaseReport>,
    /// Committed rows per kind at the end of the run, including rows from
    /// earlier runs that were resumed.
    pub committed: CommittedCounts,
    /// Monitor spans, slowest first.
    pub spans: Vec<SpanResult>,
    #[serde(serialize_with = "serialize_millis")]
    pub total_duration: Duration,
}

impl RunReport {
    pub fn phase(&self, kind: EntityKind) -> Option<&PhaseReport> {
        self.phases.iter().find(|phase| phase.kind == kind)
    }

    pub fn total_skipped(&self) -> u64 {
        self.phases.iter().map(|phase| phase.skipped).sum()
    }

    /// Log a per-phase summary at info level.
    pub fn log(&self) {
        info!(
            "Run complete in {:?} (seed {}, {} rows committed)",
            self.total_duration,
            self.seed,
            self.committed.total()
        );
        for phase in &self.phases {
            info!(
                "  {}: {} committed, {} skipped, {} batches, peak {} buffered, {:?} ({:.2} rows/sec)",
                phase.kind,
                phase.committed,
                phase.skipped,
                phase.batches,
                phase.peak_buffered,
                phase.total_duration,
                phase.rows_per_second()
            );
        }
        if self.total_skipped() > 0 {
            warn!(
                "{} records were skipped because a referenced parent was not committed",
                self.total_skipped()
            );
        }
    }
}

fn serialize_millis<S: serde::Serializer>(
    duration: &Duration,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.serialize_u64(duration.as_millis() as u64)
}

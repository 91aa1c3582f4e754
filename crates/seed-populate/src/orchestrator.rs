//! Phase orchestration.
//!
//! Runs one phase per entity kind in dependency order. Each phase loops over
//! `ceil(volume / batch_size)` batches: draft, resolve references, flush.
//! At most one batch is buffered at a time, and the next batch is only
//! drafted after the previous flush committed, so every reference resolves
//! against durable rows.

use checkpoint::{Checkpoint, CheckpointFile, CheckpointStore, NullStore};
use perf_monitor::PerformanceMonitor;
use seed_core::{EntityKind, PhasePlan, Record, RunPlan, SeedConfig};
use seed_generator::RecordGenerator;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::ops::Range;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, info, warn};

use crate::error::PopulateError;
use crate::report::{PhaseReport, RunReport};
use crate::resolver::{CommittedCounts, ReferenceResolver};
use crate::store::EntityStore;
use crate::writer::{BatchBuffer, BatchWriter, BufferGauge};

/// State written at every phase boundary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunCheckpoint {
    pub seed: u64,
    /// Phase that was running when the checkpoint was taken.
    pub phase: EntityKind,
    /// Whether `phase` ran to completion.
    pub completed: bool,
    /// Committed rows per kind.
    pub committed: CommittedCounts,
    /// Next logical index to draft per kind. Ahead of the committed count
    /// when records were skipped.
    pub next_index: BTreeMap<EntityKind, u64>,
}

impl Checkpoint for RunCheckpoint {
    const CHECKPOINT_TYPE: &'static str = "seedbench-populate";

    fn summary(&self) -> String {
        let state = if self.completed {
            "completed"
        } else {
            "interrupted"
        };
        format!("{} {} ({})", self.phase, state, self.committed)
    }
}

#[derive(Debug, Default)]
struct RunState {
    committed: CommittedCounts,
    next_index: BTreeMap<EntityKind, u64>,
}

/// Drives a populate run.
pub struct Orchestrator {
    plan: RunPlan,
    generator: Arc<RecordGenerator>,
    resolver: ReferenceResolver,
    store: Arc<dyn EntityStore>,
    monitor: Arc<PerformanceMonitor>,
    checkpoints: Arc<dyn CheckpointStore>,
    resume: bool,
    gauge: BufferGauge,
}

impl Orchestrator {
    pub fn new(
        plan: RunPlan,
        store: Arc<dyn EntityStore>,
        monitor: Arc<PerformanceMonitor>,
    ) -> Self {
        Self {
            generator: Arc::new(RecordGenerator::from_plan(&plan)),
            resolver: ReferenceResolver::new(&plan),
            plan,
            store,
            monitor,
            checkpoints: Arc::new(NullStore),
            resume: false,
            gauge: BufferGauge::new(),
        }
    }

    /// Validate `config` and build an orchestrator for it.
    ///
    /// Fails before anything is generated or written.
    pub fn from_config(
        config: &SeedConfig,
        store: Arc<dyn EntityStore>,
        monitor: Arc<PerformanceMonitor>,
    ) -> Result<Self, PopulateError> {
        Ok(Self::new(config.validate()?, store, monitor))
    }

    /// Write a checkpoint after every phase.
    pub fn with_checkpoints(mut self, checkpoints: Arc<dyn CheckpointStore>) -> Self {
        self.checkpoints = checkpoints;
        self
    }

    /// Continue from the latest checkpoint (or from store counts when there
    /// is none) instead of starting from an empty store.
    pub fn with_resume(mut self, resume: bool) -> Self {
        self.resume = resume;
        self
    }

    pub fn plan(&self) -> &RunPlan {
        &self.plan
    }

    pub fn gauge(&self) -> &BufferGauge {
        &self.gauge
    }

    /// Run every phase in order.
    pub async fn run(&self) -> Result<RunReport, PopulateError> {
        let started = Instant::now();
        let state = self.initial_state().await?;
        let mut next_index = state.next_index;
        let mut writer = BatchWriter::new(
            Arc::clone(&self.store),
            Arc::clone(&self.monitor),
            state.committed,
        )
        .with_batch_spans(self.plan.batch_spans);

        info!(
            "Starting population: seed {}, {} generation worker(s), {:?} reference domain",
            self.plan.seed, self.plan.generation_workers, self.plan.reference_domain
        );

        let mut phases = Vec::with_capacity(EntityKind::ALL.len());
        let mut current = Some(EntityKind::Department);
        while let Some(kind) = current {
            let phase = self.plan.phase(kind);
            let span = format!("populate.{kind}");
            let description = format!("Populate {} {}", phase.volume, kind);

            let outcome = self
                .monitor
                .measure_async(
                    &span,
                    &description,
                    self.run_phase(phase, &mut writer, &mut next_index),
                )
                .await;

            match outcome {
                Ok(report) => {
                    self.save_checkpoint(kind, true, writer.committed(), &next_index)
                        .await?;
                    phases.push(report);
                }
                Err(source) => {
                    let committed = writer.committed().clone();
                    error!("{} phase failed: {}", kind.display_name(), source);
                    error!("Committed at failure: {}", committed);
                    if let Err(e) = self
                        .save_checkpoint(kind, false, &committed, &next_index)
                        .await
                    {
                        warn!("Could not record failure checkpoint: {}", e);
                    }
                    return Err(PopulateError::PhaseFailed {
                        kind,
                        committed,
                        source: Box::new(source),
                    });
                }
            }
            current = kind.next();
        }
        info!("All phases done");

        Ok(RunReport {
            seed: self.plan.seed,
            phases,
            committed: writer.committed().clone(),
            spans: self.monitor.summary(),
            total_duration: started.elapsed(),
        })
    }

    async fn run_phase(
        &self,
        phase: &PhasePlan,
        writer: &mut BatchWriter,
        next_index: &mut BTreeMap<EntityKind, u64>,
    ) -> Result<PhaseReport, PopulateError> {
        let kind = phase.kind;
        let started = Instant::now();
        let mut index = next_index.get(&kind).copied().unwrap_or(0);
        let mut report = PhaseReport::new(kind, phase.volume, index);
        self.gauge.reset_peak();

        if index >= phase.volume {
            info!(
                "{}: {} of {} created (already complete)",
                kind.display_name(),
                writer.committed().get(kind),
                phase.volume
            );
            report.total_duration = started.elapsed();
            return Ok(report);
        }

        info!(
            "Populating {} with {} rows (batch size: {}, {} batches, starting at {})",
            kind,
            phase.volume,
            phase.batch_size,
            phase.batch_count(),
            index
        );

        let interval = self.plan.progress_interval_rows;
        let batches_before = writer.batches(kind);
        let mut logged_at = None;

        while index < phase.volume {
            let len = phase.batch_len_at(index);
            let range = index..index + len as u64;

            let generation_started = Instant::now();
            let mut buffer = BatchBuffer::reserve(kind, len, &self.gauge);
            buffer.extend(self.generate(kind, range.clone()).await?);
            let skipped = self.resolve(&mut buffer, writer.committed());
            report.generation_duration += generation_started.elapsed();
            report.generated += len as u64;
            report.skipped += skipped;

            let insert_started = Instant::now();
            let batch = writer.batches(kind) + 1;
            let outcome = writer
                .flush_batch(buffer)
                .await
                .map_err(|source| PopulateError::BatchWrite {
                    kind,
                    batch,
                    source,
                })?;
            report.insert_duration += insert_started.elapsed();
            report.committed += outcome.rows;

            let previous = index;
            index = range.end;
            next_index.insert(kind, index);

            if crossed_interval(previous, index, interval) {
                info!(
                    "{}: {} of {} created",
                    kind.display_name(),
                    outcome.committed_total,
                    phase.volume
                );
                logged_at = Some(index);
            }
        }

        if logged_at != Some(index) {
            info!(
                "{}: {} of {} created",
                kind.display_name(),
                writer.committed().get(kind),
                phase.volume
            );
        }
        if report.skipped > 0 {
            warn!(
                "{}: skipped {} of {} records with unresolved references",
                kind.display_name(),
                report.skipped,
                report.generated
            );
        }

        report.batches = writer.batches(kind) - batches_before;
        report.peak_buffered = self.gauge.peak();
        report.total_duration = started.elapsed();
        Ok(report)
    }

    /// Draft the records in `range`, spreading the work over the configured
    /// number of blocking tasks. Output order is index order either way.
    async fn generate(
        &self,
        kind: EntityKind,
        range: Range<u64>,
    ) -> Result<Vec<Record>, PopulateError> {
        let workers = self.plan.generation_workers as u64;
        let len = range.end - range.start;
        if workers <= 1 || len < 2 {
            return Ok(self.generator.draft_range(kind, range));
        }

        let chunk = len.div_ceil(workers);
        let mut handles = Vec::with_capacity(workers as usize);
        let mut start = range.start;
        while start < range.end {
            let end = (start + chunk).min(range.end);
            let generator = Arc::clone(&self.generator);
            handles.push(tokio::task::spawn_blocking(move || {
                generator.draft_range(kind, start..end)
            }));
            start = end;
        }

        let mut records = Vec::with_capacity(len as usize);
        for handle in handles {
            records.extend(handle.await?);
        }
        Ok(records)
    }

    /// Resolve references in place and drop records that cannot be
    /// resolved. Returns the number dropped.
    fn resolve(&self, buffer: &mut BatchBuffer, committed: &CommittedCounts) -> u64 {
        let kind = buffer.kind();
        let before = buffer.len();
        buffer.records_mut().retain_mut(|record| {
            let index = record.index();
            let mut rng = self.generator.reference_rng(kind, index);
            match self.resolver.resolve(record, &mut rng, committed) {
                Ok(()) => true,
                Err(e) => {
                    debug!("Skipping {} {}: {}", kind, index, e);
                    false
                }
            }
        });
        (before - buffer.len()) as u64
    }

    async fn initial_state(&self) -> Result<RunState, PopulateError> {
        let mut state = RunState::default();
        if !self.resume {
            return Ok(state);
        }
        for kind in EntityKind::ALL {
            self.store.realign_ids(kind).await?;
        }

        let latest = self
            .checkpoints
            .read_latest()
            .await
            .map_err(|e| PopulateError::Checkpoint(format!("{e:#}")))?;

        match latest {
            Some(file) => {
                let checkpoint: RunCheckpoint = file
                    .parse()
                    .map_err(|e| PopulateError::Checkpoint(format!("{e:#}")))?;
                info!(
                    "Resuming from checkpoint '{}': {}",
                    file.label(),
                    checkpoint.summary()
                );
                if checkpoint.seed != self.plan.seed {
                    warn!(
                        "Checkpoint was written with seed {}, resuming with seed {}",
                        checkpoint.seed, self.plan.seed
                    );
                }
                for kind in EntityKind::ALL {
                    let stored = self.store.count(kind).await?;
                    let recorded = checkpoint.committed.get(kind);
                    if stored != recorded {
                        return Err(PopulateError::CheckpointMismatch {
                            kind,
                            checkpoint: recorded,
                            store: stored,
                        });
                    }
                }
                state.committed = checkpoint.committed;
                state.next_index = checkpoint.next_index;
            }
            None => {
                for kind in EntityKind::ALL {
                    let stored = self.store.count(kind).await?;
                    state.committed.raise_to(kind, stored);
                    state.next_index.insert(kind, stored);
                }
                info!("No checkpoint found, resuming from store counts: {}", state.committed);
            }
        }
        Ok(state)
    }

    async fn save_checkpoint(
        &self,
        phase: EntityKind,
        completed: bool,
        committed: &CommittedCounts,
        next_index: &BTreeMap<EntityKind, u64>,
    ) -> Result<(), PopulateError> {
        let checkpoint = RunCheckpoint {
            seed: self.plan.seed,
            phase,
            completed,
            committed: committed.clone(),
            next_index: next_index.clone(),
        };
        let label = if completed {
            format!("{phase}_done")
        } else {
            format!("{phase}_failed")
        };
        let file = CheckpointFile::new(&checkpoint, label)
            .map_err(|e| PopulateError::Checkpoint(format!("{e:#}")))?;
        self.checkpoints
            .store_checkpoint(&file)
            .await
            .map_err(|e| PopulateError::Checkpoint(format!("{e:#}")))?;
        debug!("Checkpoint written: {}", checkpoint.summary());
        Ok(())
    }
}

/// Whether moving from `previous` to `current` rows passes a multiple of
/// `interval`. An interval of 0 never triggers.
pub fn crossed_interval(previous: u64, current: u64, interval: u64) -> bool {
    interval > 0 && previous / interval != current / interval
}

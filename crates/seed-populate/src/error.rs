//! Error types for the population engine.

use seed_core::{ConfigError, EntityKind};
use thiserror::Error;

use crate::resolver::CommittedCounts;

/// Errors raised by a persistence backend.
#[derive(Error, Debug)]
pub enum StoreError {
    /// The store refused a batch; nothing from it was committed.
    #[error("Store rejected {kind} batch: {message}")]
    Rejected { kind: EntityKind, message: String },

    /// The store committed a different number of rows than it was given.
    #[error("Store committed {committed} of {expected} {kind} rows")]
    PartialCommit {
        kind: EntityKind,
        expected: u64,
        committed: u64,
    },

    /// Backend-specific failure (connection, query, ...).
    #[error("Store backend error: {0}")]
    Backend(#[from] Box<dyn std::error::Error + Send + Sync>),
}

/// Errors that end a populate run.
#[derive(Error, Debug)]
pub enum PopulateError {
    /// Configuration validation failed before anything was generated.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// A batch flush failed.
    #[error("Failed to flush {kind} batch {batch}: {source}")]
    BatchWrite {
        kind: EntityKind,
        batch: u64,
        #[source]
        source: StoreError,
    },

    /// A phase stopped; carries the counts that were committed before it did.
    #[error("Phase {kind} failed (committed so far: {committed}): {source}")]
    PhaseFailed {
        kind: EntityKind,
        committed: CommittedCounts,
        #[source]
        source: Box<PopulateError>,
    },

    /// Store query outside of a flush (counts, statistics).
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Checkpoint could not be written or read.
    #[error("Checkpoint error: {0}")]
    Checkpoint(String),

    /// Resume found a checkpoint that disagrees with the store.
    #[error("Checkpoint records {checkpoint} committed {kind} rows but the store has {store}")]
    CheckpointMismatch {
        kind: EntityKind,
        checkpoint: u64,
        store: u64,
    },

    /// A generation worker task panicked or was cancelled.
    #[error("Generation worker failed: {0}")]
    Worker(#[from] tokio::task::JoinError),
}

impl PopulateError {
    /// The phase a run failed in, if the failure happened inside one.
    pub fn failed_phase(&self) -> Option<EntityKind> {
        match self {
            PopulateError::PhaseFailed { kind, .. } => Some(*kind),
            PopulateError::BatchWrite { kind, .. } => Some(*kind),
            _ => None,
        }
    }
}

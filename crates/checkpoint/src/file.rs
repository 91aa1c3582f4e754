//! Checkpoint file wrapper for storage-agnostic serialization.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::Checkpoint;

/// A checkpoint payload plus the metadata needed to find and validate it.
///
/// # File Format
///
/// ```json
/// {
///     "checkpoint_type": "seedbench-populate",
///     "label": "users_done",
///     "checkpoint": {
///         "seed": 42,
///         "phase": "user",
///         "completed": true,
///         "committed": { "department": 50, "category": 100, "user": 10000 },
///         "next_index": { "department": 50, "category": 100, "user": 10000 }
///     },
///     "created_at": "2026-01-01T00:00:00Z"
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckpointFile {
    /// Checkpoint type identifier
    pub checkpoint_type: String,
    /// Boundary this checkpoint was written at (used in file names)
    pub label: String,
    /// Payload, kept as JSON until the caller parses it
    pub checkpoint: serde_json::Value,
    /// Timestamp when this checkpoint file was created
    pub created_at: DateTime<Utc>,
}

impl CheckpointFile {
    /// Create new checkpoint file from a checkpoint payload.
    pub fn new<C: Checkpoint>(checkpoint: &C, label: impl Into<String>) -> anyhow::Result<Self> {
        Ok(Self {
            checkpoint_type: C::CHECKPOINT_TYPE.to_string(),
            label: label.into(),
            checkpoint: serde_json::to_value(checkpoint)?,
            created_at: Utc::now(),
        })
    }

    /// Parse checkpoint into its concrete type.
    ///
    /// Validates that the stored `checkpoint_type` matches the expected type `C`.
    pub fn parse<C: Checkpoint>(&self) -> anyhow::Result<C> {
        if self.checkpoint_type != C::CHECKPOINT_TYPE {
            anyhow::bail!(
                "Checkpoint type mismatch: expected '{}', found '{}'",
                C::CHECKPOINT_TYPE,
                self.checkpoint_type
            );
        }
        Ok(serde_json::from_value(self.checkpoint.clone())?)
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

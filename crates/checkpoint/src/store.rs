//! Checkpoint storage trait.

use anyhow::Result;
use async_trait::async_trait;

use crate::CheckpointFile;

/// Trait for checkpoint storage operations.
///
/// This trait abstracts the storage backend for checkpoint operations,
/// allowing the same checkpoint logic to work with:
/// - Filesystem storage (`FilesystemStore`)
/// - No storage at all (`NullStore`)
#[async_trait]
pub trait CheckpointStore: Send + Sync {
    /// Store a checkpoint in the storage backend.
    async fn store_checkpoint(&self, file: &CheckpointFile) -> Result<()>;

    /// Read the most recently created checkpoint.
    ///
    /// Returns None if no checkpoint exists.
    async fn read_latest(&self) -> Result<Option<CheckpointFile>>;
}

/// Store that discards every checkpoint.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullStore;

#[async_trait]
impl CheckpointStore for NullStore {
    async fn store_checkpoint(&self, file: &CheckpointFile) -> Result<()> {
        tracing::debug!("Discarding checkpoint '{}' (no checkpoint storage)", file.label);
        Ok(())
    }

    async fn read_latest(&self) -> Result<Option<CheckpointFile>> {
        Ok(None)
    }
}

//! Filesystem-based checkpoint storage implementation.

use anyhow::{Context, Result};
use async_trait::async_trait;
use std::path::PathBuf;

use crate::store::CheckpointStore;
use crate::CheckpointFile;

/// Filesystem implementation of CheckpointStore trait.
///
/// Stores checkpoints as JSON files named
/// `checkpoint_{label}_{timestamp}.json` in a directory.
pub struct FilesystemStore {
    dir: PathBuf,
}

impl FilesystemStore {
    /// Create a new FilesystemStore with the given directory.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Get the directory path.
    pub fn dir(&self) -> &PathBuf {
        &self.dir
    }
}

#[async_trait]
impl CheckpointStore for FilesystemStore {
    async fn store_checkpoint(&self, file: &CheckpointFile) -> Result<()> {
        std::fs::create_dir_all(&self.dir).with_context(|| {
            format!("Failed to create checkpoint directory {}", self.dir.display())
        })?;

        let timestamp = file.created_at.format("%Y%m%dT%H%M%S%.6fZ");
        let filename = self
            .dir
            .join(format!("checkpoint_{}_{}.json", file.label, timestamp));

        std::fs::write(&filename, serde_json::to_string_pretty(file)?)?;
        tracing::info!("Stored checkpoint to {}", filename.display());
        Ok(())
    }

    async fn read_latest(&self) -> Result<Option<CheckpointFile>> {
        if !self.dir.exists() {
            return Ok(None);
        }

        let mut latest: Option<CheckpointFile> = None;

        for entry in std::fs::read_dir(&self.dir)? {
            let entry = entry?;
            let filename = entry.file_name().to_string_lossy().to_string();
            if !(filename.starts_with("checkpoint_") && filename.ends_with(".json")) {
                continue;
            }

            let content = std::fs::read_to_string(entry.path())?;
            let file: CheckpointFile = serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse checkpoint file {filename}"))?;

            let is_newer = latest
                .as_ref()
                .map_or(true, |current| file.created_at > current.created_at);
            if is_newer {
                latest = Some(file);
            }
        }

        Ok(latest)
    }
}

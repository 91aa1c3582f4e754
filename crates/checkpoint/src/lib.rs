//! Phase-boundary checkpoints for seedbench populate runs.
//!
//! A run writes one [`CheckpointFile`] after every phase (and one when a
//! phase fails). `--resume` reads the newest file back, so a later run can
//! compare it with the store and pick up where the last one stopped.
//!
//! Payloads are any type implementing [`Checkpoint`]; the file records the
//! payload type so a file written by another tool is rejected on parse.
//! [`FilesystemStore`] keeps JSON files in a directory and [`NullStore`]
//! discards everything when no `--checkpoint-dir` is given.

mod file;
mod filesystem;
pub mod store;


pub use file::CheckpointFile;
pub use filesystem::FilesystemStore;
pub use store::{CheckpointStore, NullStore};

/// Trait that checkpoint payloads must implement.
///
/// # Example
///
/// ```rust
/// use checkpoint::Checkpoint;
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Debug, Clone, Serialize, Deserialize)]
/// pub struct RowsWritten {
///     pub rows: u64,
/// }
///
/// impl Checkpoint for RowsWritten {
///     const CHECKPOINT_TYPE: &'static str = "rows-written";
///
///     fn summary(&self) -> String {
///         format!("{} rows", self.rows)
///     }
/// }
/// ```
pub trait Checkpoint: serde::Serialize + for<'de> serde::Deserialize<'de> + Clone {
    /// Tag written into every file and checked by [`CheckpointFile::parse`].
    const CHECKPOINT_TYPE: &'static str;

    /// One-line description for logging.
    fn summary(&self) -> String;
}

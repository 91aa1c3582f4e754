//! Population engine for seedbench.
//!
//! This crate drives a run end to end:
//!
//! ```text
//! RunPlan ──► Orchestrator ──► for each phase (dependency order)
//!                 │
//!                 ├── RecordGenerator   drafts one batch of records
//!                 ├── ReferenceResolver fills FKs from committed counts
//!                 ├── BatchWriter       flushes through an EntityStore
//!                 └── PerformanceMonitor spans per phase (and per batch)
//! ```
//!
//! The persistence boundary is the [`EntityStore`] trait. [`MemoryStore`]
//! implements it in process; `seed-populate-postgresql` implements it for
//! PostgreSQL.

pub mod args;
pub mod error;
pub mod memory;
pub mod orchestrator;
pub mod report;
pub mod resolver;
pub mod store;
pub mod writer;

pub use args::CommonPopulateArgs;
pub use error::{PopulateError, StoreError};
pub use memory::MemoryStore;
pub use orchestrator::{Orchestrator, RunCheckpoint};
pub use report::{PhaseReport, RunReport};
pub use resolver::{CommittedCounts, ReferenceResolver, ResolutionError};
pub use store::{EntityStore, StoreStatistics, TableStatistics};
pub use writer::{BatchBuffer, BatchWriter, BufferGauge, FlushOutcome};

//! Record generator for the seedbench dataset generator.
//!
//! This crate provides the [`RecordGenerator`], which drafts records for any
//! entity kind as a pure function of `(seed, kind, logical index)`. There is
//! no shared generator state: every index gets its own seeded RNG, so output
//! does not depend on batch size, generation order or the number of workers.
//!
//! # Architecture
//!
//! ```text
//!   (seed, kind, index)
//!          │
//!          ▼
//! ┌──────────────────────┐
//! │   RecordGenerator    │
//! │                      │
//! │  - seed              │
//! │  - blob plans        │
//! └─────────┬────────────┘
//!           │  identity fields: vocabulary pools, index-modular selection
//!           │  numeric fields:  per-index StdRng
//!           ▼
//!   Record (foreign keys unresolved)
//! ```
//!
//! # Example
//!
//! ```rust
//! use seed_core::EntityKind;
//! use seed_generator::RecordGenerator;
//!
//! let generator = RecordGenerator::new(42);
//! let first = generator.draft(EntityKind::User, 2);
//! let second = RecordGenerator::new(42).draft(EntityKind::User, 2);
//! assert_eq!(first, second);
//! ```

pub mod generator;
pub mod generators;

// Re-exports for convenience
pub use generator::{RecordGenerator, RecordIterator};

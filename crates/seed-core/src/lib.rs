//! Core types for the seedbench dataset generator.
//!
//! This crate provides the foundational types shared by the generator,
//! the populators and the CLI:
//!
//! - [`EntityKind`] - The six entity kinds and their fixed phase order
//! - [`Record`] - One logical row of a given kind, FKs possibly unresolved
//! - [`FieldValue`] - Column value handed to a persistence backend
//! - [`SeedConfig`] / [`RunPlan`] - Run configuration loaded from YAML and its validated form
//!
//! # Architecture
//!
//! ```text
//! seed-core (this crate)
//!    │
//!    ├─── seed-generator            (drafts records from seed + index)
//!    ├─── seed-populate             (writer, resolver, orchestrator, memory store)
//!    └─── seed-populate-postgresql  (PostgreSQL persistence boundary)
//! ```
//!
//! # Example
//!
//! ```rust
//! use seed_core::{EntityKind, SeedConfig};
//!
//! let config = SeedConfig::from_yaml("seed: 7\nvolumes:\n  users: 250\n").unwrap();
//! let plan = config.validate().unwrap();
//!
//! assert_eq!(plan.seed, 7);
//! assert_eq!(plan.phase(EntityKind::User).volume, 250);
//! ```

pub mod config;
pub mod entity;
pub mod record;
pub mod values;

pub use config::{
    BlobConfig, BlobPlan, ConfigError, PhasePlan, ReferenceDomain, RunPlan, SeedConfig,
};
pub use entity::EntityKind;
pub use record::{Category, Department, Order, OrderItem, OrderStatus, Product, Record, User};
pub use values::FieldValue;

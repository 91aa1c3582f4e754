//! PostgreSQL backend for seedbench.
//!
//! [`PostgreSQLStore`] implements [`seed_populate::EntityStore`] with
//! multi-row `INSERT` statements, one transaction per batch.

pub mod args;
pub mod ddl;
pub mod error;
pub mod insert;
mod store;

pub use args::PostgreSQLPopulateArgs;
pub use error::PostgreSQLStoreError;
pub use store::PostgreSQLStore;

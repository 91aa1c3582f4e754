//! Error types for the PostgreSQL store.

use seed_populate::StoreError;
use thiserror::Error;

/// Errors that can occur while talking to PostgreSQL.
#[derive(Error, Debug)]
pub enum PostgreSQLStoreError {
    /// PostgreSQL connection or query error.
    #[error("PostgreSQL error: {0}")]
    PostgreSQL(#[from] tokio_postgres::Error),

    /// A column value did not fit the column it is written to.
    #[error("Column '{column}' cannot hold {value}")]
    ColumnType { column: String, value: String },

    /// Stored ids are not `1..=rows`, so committed counts cannot be used as
    /// the id range of the table.
    #[error("Table '{table}' has {rows} rows but its highest id is {max_id}")]
    IdGap { table: String, rows: u64, max_id: u64 },

    /// Connection error.
    #[error("Connection error: {0}")]
    Connection(String),
}

impl From<PostgreSQLStoreError> for StoreError {
    fn from(err: PostgreSQLStoreError) -> Self {
        StoreError::Backend(Box::new(err))
    }
}

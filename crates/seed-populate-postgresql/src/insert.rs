//! Batched INSERT logic for PostgreSQL.

use seed_core::{EntityKind, FieldValue, Record};
use tokio_postgres::types::ToSql;
use tokio_postgres::Transaction;

use crate::ddl::{table_columns, ColumnDefinition, ColumnType};
use crate::error::PostgreSQLStoreError;

/// Bind parameters a single statement may carry.
pub const MAX_PARAMETERS: usize = 65_535;

/// Rows per INSERT statement for `kind`, bounded by [`MAX_PARAMETERS`].
pub fn rows_per_statement(kind: EntityKind) -> usize {
    (MAX_PARAMETERS / table_columns(kind).len()).max(1)
}

/// Build `INSERT INTO "t" ("a", "b") VALUES ($1, $2), ($3, $4)` for `rows` rows.
pub fn insert_statement(kind: EntityKind, rows: usize) -> String {
    let columns = table_columns(kind);
    let mut placeholders: Vec<String> = Vec::with_capacity(rows);
    let mut param_idx = 1;

    for _ in 0..rows {
        let row_placeholders: Vec<String> = (0..columns.len())
            .map(|_| {
                let p = format!("${param_idx}");
                param_idx += 1;
                p
            })
            .collect();
        placeholders.push(format!("({})", row_placeholders.join(", ")));
    }

    format!(
        "INSERT INTO \"{}\" ({}) VALUES {}",
        kind.table_name(),
        columns
            .iter()
            .map(|c| format!("\"{}\"", c.name))
            .collect::<Vec<_>>()
            .join(", "),
        placeholders.join(", ")
    )
}

/// Insert `records` inside `transaction`, splitting into as many statements
/// as the parameter limit requires. Returns the number of rows inserted.
pub async fn insert_batch(
    transaction: &Transaction<'_>,
    kind: EntityKind,
    records: &[Record],
) -> Result<u64, PostgreSQLStoreError> {
    let columns = table_columns(kind);
    let mut inserted = 0;

    for chunk in records.chunks(rows_per_statement(kind)) {
        let sql = insert_statement(kind, chunk.len());

        let mut params: Vec<Box<dyn ToSql + Sync + Send>> =
            Vec::with_capacity(chunk.len() * columns.len());
        for record in chunk {
            for (value, column) in record.values().into_iter().zip(columns) {
                params.push(to_sql_param(value, column)?);
            }
        }

        let param_refs: Vec<&(dyn ToSql + Sync)> = params
            .iter()
            .map(|p| p.as_ref() as &(dyn ToSql + Sync))
            .collect();

        inserted += transaction.execute(&sql, &param_refs).await?;
    }

    Ok(inserted)
}

/// Convert a column value to a boxed parameter of the column's type.
///
/// NULLs are typed after the column so the server accepts them.
pub fn to_sql_param(
    value: FieldValue,
    column: &ColumnDefinition,
) -> Result<Box<dyn ToSql + Sync + Send>, PostgreSQLStoreError> {
    let param: Box<dyn ToSql + Sync + Send> = match (value, column.column_type) {
        (FieldValue::Null, ColumnType::BigInt) if column.nullable => Box::new(None::<i64>),
        (FieldValue::Null, ColumnType::Bytea) if column.nullable => Box::new(None::<Vec<u8>>),
        (FieldValue::Int64(i), ColumnType::BigInt) => Box::new(i),
        (FieldValue::Int32(i), ColumnType::Integer) => Box::new(i),
        (FieldValue::Decimal(d), ColumnType::Money) => Box::new(d),
        (FieldValue::Text(s), ColumnType::Text | ColumnType::VarChar(_)) => Box::new(s),
        (FieldValue::Timestamp(ts), ColumnType::TimestampTz) => Box::new(ts),
        (FieldValue::Bytes(b), ColumnType::Bytea) => Box::new(b),
        (value, column_type) => {
            return Err(PostgreSQLStoreError::ColumnType {
                column: column.name.to_string(),
                value: format!("{value:?} (column type {})", column_type.sql()),
            })
        }
    };
    Ok(param)
}

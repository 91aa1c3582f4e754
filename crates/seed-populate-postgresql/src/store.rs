//! PostgreSQL implementation of the entity store.

use async_trait::async_trait;
use seed_core::{EntityKind, Record};
use seed_populate::{EntityStore, StoreError, StoreStatistics, TableStatistics};
use std::sync::Arc;
use tokio::sync::Mutex;
use tokio_postgres::{Client, NoTls};
use tracing::{debug, info};

use crate::ddl::{generate_create_table, generate_drop_table, generate_truncate_all};
use crate::error::PostgreSQLStoreError;
use crate::insert::insert_batch;

/// Store that writes the dataset to PostgreSQL.
pub struct PostgreSQLStore {
    client: Arc<Mutex<Client>>,
}

impl PostgreSQLStore {
    /// Connect and verify the connection.
    ///
    /// # Example
    ///
    /// ```ignore
    /// let store = PostgreSQLStore::connect(
    ///     "host=localhost user=postgres password=postgres dbname=testdb",
    /// ).await?;
    /// store.create_schema().await?;
    /// ```
    pub async fn connect(connection_string: &str) -> Result<Self, PostgreSQLStoreError> {
        let (client, connection) = tokio_postgres::connect(connection_string, NoTls).await?;

        // Spawn the connection task
        tokio::spawn(async move {
            if let Err(e) = connection.await {
                tracing::error!("PostgreSQL connection error: {}", e);
            }
        });

        client.simple_query("SELECT 1").await?;

        Ok(Self {
            client: Arc::new(Mutex::new(client)),
        })
    }

    /// Wrap an existing client.
    pub fn with_client(client: Arc<Mutex<Client>>) -> Self {
        Self { client }
    }

    /// Create every table (if missing) in dependency order.
    pub async fn create_schema(&self) -> Result<(), PostgreSQLStoreError> {
        let client = self.client.lock().await;
        for kind in EntityKind::ALL {
            let sql = generate_create_table(kind);
            info!("Creating table: {}", kind);
            debug!("DDL: {}", sql);
            client.execute(&sql, &[]).await?;
        }
        Ok(())
    }

    /// Drop every table, dependents first.
    pub async fn drop_schema(&self) -> Result<(), PostgreSQLStoreError> {
        let client = self.client.lock().await;
        for kind in EntityKind::ALL.iter().rev() {
            info!("Dropping table: {}", kind);
            client.execute(&generate_drop_table(*kind), &[]).await?;
        }
        Ok(())
    }

    /// Drop and recreate every table.
    pub async fn recreate_schema(&self) -> Result<(), PostgreSQLStoreError> {
        self.drop_schema().await?;
        self.create_schema().await
    }

    /// Delete all rows and restart id assignment at 1.
    pub async fn truncate_all(&self) -> Result<(), PostgreSQLStoreError> {
        let client = self.client.lock().await;
        info!("Truncating all tables");
        client.batch_execute(&generate_truncate_all()).await?;
        Ok(())
    }

    async fn table_statistics(
        &self,
        kind: EntityKind,
    ) -> Result<TableStatistics, PostgreSQLStoreError> {
        let blob_bytes = match kind.blob_column() {
            Some(column) => format!("COALESCE(SUM(octet_length(\"{column}\")), 0)::BIGINT"),
            None => "0::BIGINT".to_string(),
        };
        let sql = format!(
            "SELECT COUNT(*), pg_total_relation_size('\"{table}\"'), {blob_bytes} FROM \"{table}\"",
            table = kind.table_name()
        );
        let client = self.client.lock().await;
        let row = client.query_one(&sql, &[]).await?;
        let rows: i64 = row.get(0);
        let total_bytes: i64 = row.get(1);
        let blob_bytes: i64 = row.get(2);
        Ok(TableStatistics {
            kind,
            rows: rows as u64,
            total_bytes: Some(total_bytes as u64),
            blob_bytes: blob_bytes as u64,
        })
    }
}

#[async_trait]
impl EntityStore for PostgreSQLStore {
    async fn bulk_insert(&self, kind: EntityKind, records: &[Record]) -> Result<u64, StoreError> {
        if records.is_empty() {
            return Ok(0);
        }
        let mut client = self.client.lock().await;
        let transaction = client
            .transaction()
            .await
            .map_err(PostgreSQLStoreError::from)?;
        let inserted = insert_batch(&transaction, kind, records).await?;
        transaction
            .commit()
            .await
            .map_err(PostgreSQLStoreError::from)?;
        Ok(inserted)
    }

    async fn count(&self, kind: EntityKind) -> Result<u64, StoreError> {
        let client = self.client.lock().await;
        let sql = format!("SELECT COUNT(*) FROM \"{}\"", kind.table_name());
        let row = client
            .query_one(&sql, &[])
            .await
            .map_err(PostgreSQLStoreError::from)?;
        let count: i64 = row.get(0);
        Ok(count as u64)
    }

    /// Sequence values consumed by a rolled-back batch are not returned, so
    /// rewind the id sequence to `MAX(id) + 1`.
    async fn realign_ids(&self, kind: EntityKind) -> Result<(), StoreError> {
        let table = kind.table_name();
        let client = self.client.lock().await;
        let row = client
            .query_one(
                &format!("SELECT COUNT(*), COALESCE(MAX(\"id\"), 0) FROM \"{table}\""),
                &[],
            )
            .await
            .map_err(PostgreSQLStoreError::from)?;
        let rows: i64 = row.get(0);
        let max_id: i64 = row.get(1);
        if rows != max_id {
            return Err(PostgreSQLStoreError::IdGap {
                table: table.to_string(),
                rows: rows as u64,
                max_id: max_id as u64,
            }
            .into());
        }

        client
            .query_one(
                "SELECT setval(pg_get_serial_sequence($1, 'id'), $2, false)",
                &[&format!("\"{table}\""), &(max_id + 1)],
            )
            .await
            .map_err(PostgreSQLStoreError::from)?;
        debug!("Id sequence of {} realigned to {}", table, max_id + 1);
        Ok(())
    }

    async fn statistics(&self) -> Result<StoreStatistics, StoreError> {
        let mut tables = Vec::with_capacity(EntityKind::ALL.len());
        for kind in EntityKind::ALL {
            tables.push(self.table_statistics(kind).await?);
        }
        Ok(StoreStatistics { tables })
    }
}

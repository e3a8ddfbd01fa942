//! PostgreSQL primary sink
//!
//! Implements the transactional insert-if-absent contract: each table write
//! runs as one transaction of parameterized multi-row inserts with
//! `ON CONFLICT ... DO NOTHING` on the declared key. First write wins
//! across runs. Any failure rolls the whole table back; the error is
//! returned to the writer, which records it as fatal.

use crate::adapters::postgres::client::PostgresClient;
use crate::adapters::sink::{PrimarySink, PrimaryWrite};
use crate::domain::{DatabaseError, Record, Result};
use async_trait::async_trait;
use std::sync::Arc;
use tokio_postgres::types::ToSql;

/// Rows per INSERT statement, keeping bind-parameter counts well under the
/// wire protocol's 16-bit limit.
const INSERT_CHUNK_ROWS: usize = 1000;

/// Primary sink backed by PostgreSQL
pub struct PostgresSink {
    client: Arc<PostgresClient>,
}

impl PostgresSink {
    /// Create a new PostgreSQL sink over a shared client
    pub fn new(client: Arc<PostgresClient>) -> Self {
        Self { client }
    }

    /// Get a reference to the underlying client
    pub fn client(&self) -> &Arc<PostgresClient> {
        &self.client
    }
}

#[async_trait]
impl PrimarySink for PostgresSink {
    async fn test_connection(&self) -> Result<()> {
        self.client.test_connection().await
    }

    async fn insert_records<R: Record>(&self, records: &[R]) -> Result<PrimaryWrite> {
        if records.is_empty() {
            return Ok(PrimaryWrite::default());
        }

        let table = R::TABLE.as_str();
        let mut conn = self.client.get_connection().await?;

        let tx = conn.transaction().await.map_err(|e| {
            DatabaseError::TransactionFailed(format!("Failed to begin transaction: {e}"))
        })?;

        // Scope the statement timeout to this transaction
        let timeout_stmt = format!(
            "SET LOCAL statement_timeout = {}",
            self.client.statement_timeout_ms()
        );
        tx.execute(timeout_stmt.as_str(), &[]).await.map_err(|e| {
            DatabaseError::TransactionFailed(format!("Failed to set statement timeout: {e}"))
        })?;

        let mut inserted = 0usize;

        for chunk in records.chunks(INSERT_CHUNK_ROWS) {
            let statement = build_insert_statement(table, R::COLUMNS, R::KEY_COLUMNS, chunk.len());
            let params: Vec<&(dyn ToSql + Sync)> =
                chunk.iter().flat_map(|record| record.params()).collect();

            // A failed statement drops the transaction, rolling back every
            // chunk of this table.
            let affected = tx
                .execute(statement.as_str(), &params)
                .await
                .map_err(|e| DatabaseError::InsertFailed {
                    table: table.to_string(),
                    message: e.to_string(),
                })?;

            inserted += affected as usize;
        }

        tx.commit().await.map_err(|e| {
            DatabaseError::TransactionFailed(format!("Failed to commit transaction: {e}"))
        })?;

        let attempted = records.len();
        tracing::debug!(
            table = table,
            attempted = attempted,
            inserted = inserted,
            skipped = attempted - inserted,
            "Committed insert-if-absent transaction"
        );

        Ok(PrimaryWrite {
            rows_attempted: attempted,
            rows_inserted: inserted,
            rows_skipped: attempted - inserted,
        })
    }
}

/// Build a parameterized multi-row insert with an explicit conflict target
fn build_insert_statement(
    table: &str,
    columns: &[&str],
    key_columns: &[&str],
    row_count: usize,
) -> String {
    let mut placeholder = 1usize;
    let mut rows = Vec::with_capacity(row_count);
    for _ in 0..row_count {
        let row: Vec<String> = columns
            .iter()
            .map(|_| {
                let p = format!("${placeholder}");
                placeholder += 1;
                p
            })
            .collect();
        rows.push(format!("({})", row.join(", ")));
    }

    format!(
        "INSERT INTO {} ({}) VALUES {} ON CONFLICT ({}) DO NOTHING",
        table,
        columns.join(", "),
        rows.join(", "),
        key_columns.join(", ")
    )
}

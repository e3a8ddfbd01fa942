//! Sink traits
//!
//! This module defines the traits that sink adapters must implement to work
//! with the dual-sink writer. The two sinks have deliberately different
//! contracts: the primary sink is all-or-nothing per table (source of
//! truth), the secondary sink is best-effort per batch (non-authoritative
//! replica).

use crate::domain::{Record, Result};
use async_trait::async_trait;

/// Result of one primary-sink bulk insert
#[derive(Debug, Clone, Default)]
pub struct PrimaryWrite {
    /// Rows submitted to the sink
    pub rows_attempted: usize,

    /// Rows newly inserted
    pub rows_inserted: usize,

    /// Rows skipped because their key already existed
    pub rows_skipped: usize,
}

/// Primary relational sink: transactional insert-if-absent
///
/// A whole-collection write with first-write-wins semantics across runs.
/// Implementations must perform the insert inside a single transaction:
/// a sink-level failure rolls back every row of the collection and is
/// returned as an error, never a partial commit.
#[async_trait]
pub trait PrimarySink: Send + Sync {
    /// Test connectivity to the sink
    ///
    /// # Errors
    ///
    /// Returns an error if the sink is unreachable.
    async fn test_connection(&self) -> Result<()>;

    /// Bulk insert a deduplicated collection, skipping rows whose key
    /// already exists
    ///
    /// # Errors
    ///
    /// Returns an error if the transaction cannot be completed; the
    /// transaction is rolled back and no row of the collection persists.
    async fn insert_records<R: Record>(&self, records: &[R]) -> Result<PrimaryWrite>;
}

/// Secondary API sink: batched upsert by conflict key
///
/// Each batch is an independent unit: implementations submit one batch per
/// call and report its outcome in isolation. A failed batch must not affect
/// batches already committed.
#[async_trait]
pub trait SecondarySink: Send + Sync {
    /// Upsert one batch of records by the record's declared conflict key
    ///
    /// Returns the number of rows accepted.
    ///
    /// # Errors
    ///
    /// Returns an error if this batch is rejected; prior batches are
    /// unaffected.
    async fn upsert_batch<R: Record>(&self, batch: &[R]) -> Result<usize>;
}

//! Dual-sink writer
//!
//! Commits one deduplicated entity collection to both sinks and reports a
//! combined outcome. The two sinks have asymmetric semantics by design:
//!
//! - primary (relational): all-or-nothing per table, insert-if-absent on
//!   the declared key; a sink-level failure rolls the table back and is
//!   fatal for the run
//! - secondary (API): best-effort upsert in fixed-size batches; a failed
//!   batch becomes a warning and neither aborts remaining batches nor
//!   rolls back committed ones
//!
//! For a given table the primary write and the secondary batch submissions
//! run concurrently; both sides complete (or fail) before the writer
//! returns. Every sink call is bounded by the configured timeout: a
//! timed-out primary write is a failure, a timed-out secondary batch is a
//! warning.

use crate::adapters::sink::{PrimarySink, SecondarySink};
use crate::core::pipeline::summary::{
    BatchWarning, PrimaryOutcome, SecondaryOutcome, TableReport,
};
use crate::domain::Record;
use futures::stream::{self, StreamExt};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::time::timeout;

/// Configuration for the dual-sink writer
#[derive(Debug, Clone)]
pub struct WriterConfig {
    /// Rows per secondary-sink batch (bounds request payload size)
    pub upsert_batch_size: usize,

    /// Concurrent secondary-sink batch submissions
    pub max_concurrent_batches: usize,

    /// Timeout applied to each sink call
    pub sink_timeout: Duration,

    /// Skip all sink writes, reporting would-be counts
    pub dry_run: bool,
}

impl Default for WriterConfig {
    fn default() -> Self {
        Self {
            upsert_batch_size: 1000,
            max_concurrent_batches: 4,
            sink_timeout: Duration::from_secs(60),
            dry_run: false,
        }
    }
}

/// Outcome of one secondary-sink batch submission
enum BatchStatus {
    Upserted(usize),
    Failed(String),
    Skipped,
}

/// Writer committing entity collections to both sinks
pub struct DualSinkWriter<P, S> {
    primary: Arc<P>,
    secondary: Arc<S>,
    config: WriterConfig,
    shutdown: watch::Receiver<bool>,
}

impl<P: PrimarySink, S: SecondarySink> DualSinkWriter<P, S> {
    /// Create a new dual-sink writer
    pub fn new(
        primary: Arc<P>,
        secondary: Arc<S>,
        config: WriterConfig,
        shutdown: watch::Receiver<bool>,
    ) -> Self {
        Self {
            primary,
            secondary,
            config,
            shutdown,
        }
    }

    /// Commit one deduplicated collection to both sinks
    ///
    /// The primary write and the secondary batch stream run concurrently
    /// and are joined here; the orchestrator only advances to the next
    /// table once both sides have completed or failed.
    pub async fn write_table<R: Record>(&self, records: &[R]) -> TableReport {
        if records.is_empty() {
            tracing::debug!(table = %R::TABLE, "No records to write");
            return TableReport {
                table: R::TABLE,
                primary: PrimaryOutcome::default(),
                secondary: SecondaryOutcome::default(),
            };
        }

        if self.config.dry_run {
            tracing::info!(
                table = %R::TABLE,
                rows = records.len(),
                "DRY RUN: would write {} rows to both sinks",
                records.len()
            );
            return TableReport {
                table: R::TABLE,
                primary: PrimaryOutcome {
                    rows_attempted: records.len(),
                    rows_inserted: records.len(),
                    rows_skipped: 0,
                    error: None,
                },
                secondary: SecondaryOutcome {
                    rows_attempted: records.len(),
                    rows_upserted: records.len(),
                    batches_submitted: records.len().div_ceil(self.config.upsert_batch_size.max(1)),
                    batches_skipped: 0,
                    warnings: Vec::new(),
                },
            };
        }

        tracing::info!(
            table = %R::TABLE,
            rows = records.len(),
            "Writing table to both sinks"
        );

        let (primary, secondary) =
            tokio::join!(self.write_primary(records), self.write_secondary(records));

        TableReport {
            table: R::TABLE,
            primary,
            secondary,
        }
    }

    /// Run the transactional insert-if-absent write against the primary sink
    ///
    /// A failure (including timeout) is captured on the outcome, not
    /// propagated: the caller decides that it is fatal for the run.
    async fn write_primary<R: Record>(&self, records: &[R]) -> PrimaryOutcome {
        let attempted = records.len();

        match timeout(self.config.sink_timeout, self.primary.insert_records(records)).await {
            Ok(Ok(write)) => {
                tracing::info!(
                    table = %R::TABLE,
                    attempted = write.rows_attempted,
                    inserted = write.rows_inserted,
                    skipped = write.rows_skipped,
                    "Primary sink write committed"
                );
                PrimaryOutcome {
                    rows_attempted: write.rows_attempted,
                    rows_inserted: write.rows_inserted,
                    rows_skipped: write.rows_skipped,
                    error: None,
                }
            }
            Ok(Err(e)) => {
                tracing::error!(table = %R::TABLE, error = %e, "Primary sink write failed");
                PrimaryOutcome {
                    rows_attempted: attempted,
                    rows_inserted: 0,
                    rows_skipped: 0,
                    error: Some(e.to_string()),
                }
            }
            Err(_) => {
                let message = format!(
                    "primary sink write timed out after {}s",
                    self.config.sink_timeout.as_secs()
                );
                tracing::error!(table = %R::TABLE, "{message}");
                PrimaryOutcome {
                    rows_attempted: attempted,
                    rows_inserted: 0,
                    rows_skipped: 0,
                    error: Some(message),
                }
            }
        }
    }

    /// Submit the collection to the secondary sink in independent batches
    ///
    /// Batches are submitted concurrently up to the configured limit;
    /// completion order is irrelevant since each batch is keyed and
    /// idempotent. A shutdown request stops new submissions but lets
    /// in-flight batches finish.
    async fn write_secondary<R: Record>(&self, records: &[R]) -> SecondaryOutcome {
        let batch_size = self.config.upsert_batch_size.max(1);

        let results: Vec<(usize, usize, BatchStatus)> =
            stream::iter(records.chunks(batch_size).enumerate().map(|(index, batch)| {
                let shutdown = self.shutdown.clone();
                async move {
                    if *shutdown.borrow() {
                        return (index, batch.len(), BatchStatus::Skipped);
                    }

                    match timeout(self.config.sink_timeout, self.secondary.upsert_batch(batch))
                        .await
                    {
                        Ok(Ok(upserted)) => {
                            tracing::debug!(
                                table = %R::TABLE,
                                batch_index = index,
                                rows = batch.len(),
                                "Secondary sink batch upserted"
                            );
                            (index, batch.len(), BatchStatus::Upserted(upserted))
                        }
                        Ok(Err(e)) => (index, batch.len(), BatchStatus::Failed(e.to_string())),
                        Err(_) => (
                            index,
                            batch.len(),
                            BatchStatus::Failed(format!(
                                "batch timed out after {}s",
                                self.config.sink_timeout.as_secs()
                            )),
                        ),
                    }
                }
            }))
            .buffer_unordered(self.config.max_concurrent_batches.max(1))
            .collect()
            .await;

        let mut outcome = SecondaryOutcome {
            rows_attempted: records.len(),
            ..SecondaryOutcome::default()
        };

        for (index, rows, status) in results {
            match status {
                BatchStatus::Upserted(upserted) => {
                    outcome.batches_submitted += 1;
                    outcome.rows_upserted += upserted;
                }
                BatchStatus::Failed(message) => {
                    outcome.batches_submitted += 1;
                    tracing::warn!(
                        table = %R::TABLE,
                        batch_index = index,
                        rows = rows,
                        message = %message,
                        "Secondary sink batch failed"
                    );
                    outcome.warnings.push(BatchWarning {
                        batch_index: index,
                        rows,
                        message,
                    });
                }
                BatchStatus::Skipped => {
                    outcome.batches_skipped += 1;
                }
            }
        }

        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::sink::PrimaryWrite;
    use crate::domain::{Customer, Result, TallyError};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct OkPrimary;

    #[async_trait]
    impl PrimarySink for OkPrimary {
        async fn test_connection(&self) -> Result<()> {
            Ok(())
        }

        async fn insert_records<R: Record>(&self, records: &[R]) -> Result<PrimaryWrite> {
            Ok(PrimaryWrite {
                rows_attempted: records.len(),
                rows_inserted: records.len(),
                rows_skipped: 0,
            })
        }
    }

    struct FailingPrimary;

    #[async_trait]
    impl PrimarySink for FailingPrimary {
        async fn test_connection(&self) -> Result<()> {
            Ok(())
        }

        async fn insert_records<R: Record>(&self, _records: &[R]) -> Result<PrimaryWrite> {
            Err(TallyError::Pipeline("connection reset".to_string()))
        }
    }

    /// Secondary sink failing every n-th batch, counting calls
    struct CountingSecondary {
        calls: AtomicUsize,
        fail_batch_of_rows: Option<usize>,
    }

    impl CountingSecondary {
        fn new(fail_batch_of_rows: Option<usize>) -> Self {
            Self {
                calls: AtomicUsize::new(0),
                fail_batch_of_rows,
            }
        }
    }

    #[async_trait]
    impl SecondarySink for CountingSecondary {
        async fn upsert_batch<R: Record>(&self, batch: &[R]) -> Result<usize> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if Some(batch.len()) == self.fail_batch_of_rows {
                return Err(TallyError::Pipeline("rejected".to_string()));
            }
            Ok(batch.len())
        }
    }

    fn customers(n: usize) -> Vec<Customer> {
        (0..n)
            .map(|i| Customer {
                customer_id: i as i64,
                country: "United Kingdom".to_string(),
            })
            .collect()
    }

    fn writer_config(batch_size: usize) -> WriterConfig {
        WriterConfig {
            upsert_batch_size: batch_size,
            max_concurrent_batches: 2,
            sink_timeout: Duration::from_secs(5),
            dry_run: false,
        }
    }

    fn shutdown_rx() -> watch::Receiver<bool> {
        // Receivers keep returning the last value after the sender drops
        let (_tx, rx) = watch::channel(false);
        rx
    }

    #[tokio::test]
    async fn test_write_table_success_both_sinks() {
        let writer = DualSinkWriter::new(
            Arc::new(OkPrimary),
            Arc::new(CountingSecondary::new(None)),
            writer_config(10),
            shutdown_rx(),
        );

        let report = writer.write_table(&customers(25)).await;

        assert!(!report.primary_failed());
        assert_eq!(report.primary.rows_attempted, 25);
        assert_eq!(report.primary.rows_inserted, 25);
        assert_eq!(report.secondary.rows_attempted, 25);
        assert_eq!(report.secondary.rows_upserted, 25);
        // 25 rows in batches of 10 -> 3 batches
        assert_eq!(report.secondary.batches_submitted, 3);
        assert!(report.secondary.warnings.is_empty());
    }

    #[tokio::test]
    async fn test_primary_failure_is_captured_not_thrown() {
        let writer = DualSinkWriter::new(
            Arc::new(FailingPrimary),
            Arc::new(CountingSecondary::new(None)),
            writer_config(10),
            shutdown_rx(),
        );

        let report = writer.write_table(&customers(5)).await;

        assert!(report.primary_failed());
        assert_eq!(report.primary.rows_inserted, 0);
        // Secondary side is unaffected by the primary failure
        assert_eq!(report.secondary.rows_upserted, 5);
    }

    #[tokio::test]
    async fn test_failed_batch_does_not_abort_others() {
        // Batch size 10 over 25 rows: two batches of 10, one of 5.
        // Fail the 5-row batch only.
        let secondary = Arc::new(CountingSecondary::new(Some(5)));
        let writer = DualSinkWriter::new(
            Arc::new(OkPrimary),
            secondary.clone(),
            writer_config(10),
            shutdown_rx(),
        );

        let report = writer.write_table(&customers(25)).await;

        assert_eq!(secondary.calls.load(Ordering::SeqCst), 3);
        assert_eq!(report.secondary.batches_submitted, 3);
        assert_eq!(report.secondary.rows_upserted, 20);
        assert_eq!(report.secondary.warnings.len(), 1);
        assert_eq!(report.secondary.warnings[0].rows, 5);
        // Primary unaffected
        assert!(!report.primary_failed());
        assert_eq!(report.primary.rows_inserted, 25);
    }

    #[tokio::test]
    async fn test_empty_collection_skips_sinks() {
        let secondary = Arc::new(CountingSecondary::new(None));
        let writer = DualSinkWriter::new(
            Arc::new(OkPrimary),
            secondary.clone(),
            writer_config(10),
            shutdown_rx(),
        );

        let report = writer.write_table(&Vec::<Customer>::new()).await;

        assert_eq!(report.primary.rows_attempted, 0);
        assert_eq!(report.secondary.rows_attempted, 0);
        assert_eq!(secondary.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_dry_run_skips_sinks_but_reports_counts() {
        let secondary = Arc::new(CountingSecondary::new(None));
        let mut config = writer_config(10);
        config.dry_run = true;
        let writer =
            DualSinkWriter::new(Arc::new(FailingPrimary), secondary.clone(), config, shutdown_rx());

        let report = writer.write_table(&customers(25)).await;

        assert!(!report.primary_failed());
        assert_eq!(report.primary.rows_inserted, 25);
        assert_eq!(report.secondary.rows_upserted, 25);
        assert_eq!(secondary.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_shutdown_skips_new_batches() {
        let (tx, rx) = watch::channel(true);
        let secondary = Arc::new(CountingSecondary::new(None));
        let writer = DualSinkWriter::new(
            Arc::new(OkPrimary),
            secondary.clone(),
            writer_config(10),
            rx,
        );

        let report = writer.write_table(&customers(25)).await;
        drop(tx);

        assert_eq!(secondary.calls.load(Ordering::SeqCst), 0);
        assert_eq!(report.secondary.batches_skipped, 3);
        assert_eq!(report.secondary.rows_upserted, 0);
    }
}

//! Pipeline orchestrator
//!
//! Sequences the pipeline stages — sanitize, decompose, dedup, then one
//! dual-sink write per table — and aggregates per-table, per-sink outcomes
//! into a [`RunReport`].
//!
//! Table write order is fixed: customers, products, invoices, then
//! invoice_items. The fact table logically references the other three, so
//! sinks that enforce foreign keys would reject out-of-order writes. A
//! primary-sink failure is fatal: the run halts before the next table,
//! since advancing would violate referential integrity. Secondary-sink
//! warnings never halt the run.

use crate::adapters::sink::{PrimarySink, SecondarySink};
use crate::core::dedup::dedup_by_key;
use crate::core::decompose::decompose;
use crate::core::pipeline::summary::{RunReport, Stage};
use crate::core::pipeline::writer::{DualSinkWriter, WriterConfig};
use crate::core::sanitize::sanitize;
use crate::domain::{RawRow, Record};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::watch;

/// Orchestrator for one pipeline run
///
/// Holds the sink handles for the duration of the run; they are released
/// when the orchestrator is dropped, on every exit path.
pub struct PipelineOrchestrator<P, S> {
    writer: DualSinkWriter<P, S>,
    shutdown: watch::Receiver<bool>,
}

impl<P: PrimarySink, S: SecondarySink> PipelineOrchestrator<P, S> {
    /// Create a new orchestrator over the two sink handles
    pub fn new(
        primary: Arc<P>,
        secondary: Arc<S>,
        config: WriterConfig,
        shutdown: watch::Receiver<bool>,
    ) -> Self {
        let writer = DualSinkWriter::new(primary, secondary, config, shutdown.clone());
        Self { writer, shutdown }
    }

    /// Execute one full pipeline run over the loaded raw rows
    ///
    /// Stages run in order; a primary-sink failure or a shutdown request
    /// halts the run before the next table write. The returned report
    /// always carries rows attempted vs. committed per table per sink.
    pub async fn run(&self, raw: Vec<RawRow>, dry_run: bool) -> RunReport {
        let start = Instant::now();
        let mut report = RunReport::new();
        report.dry_run = dry_run;
        report.rows_loaded = raw.len();

        tracing::info!(
            run_id = %report.run_id,
            rows_loaded = raw.len(),
            dry_run = dry_run,
            "Starting pipeline run"
        );

        // Sanitize
        let sanitized = sanitize(raw);
        report.rows_dropped = sanitized.dropped;

        // Decompose into the four entity collections
        let sets = decompose(&sanitized.rows);

        // Deduplicate each collection on its natural key
        let customers = dedup_by_key(sets.customers);
        let products = dedup_by_key(sets.products);
        let invoices = dedup_by_key(sets.invoices);
        let invoice_items = dedup_by_key(sets.invoice_items);

        tracing::info!(
            customers = customers.len(),
            products = products.len(),
            invoices = invoices.len(),
            invoice_items = invoice_items.len(),
            "Deduplicated entity collections"
        );

        // Write tables in referential order; halt on the first fatal failure
        let proceed = self.write_stage(&customers, &mut report).await;
        let proceed = proceed && self.write_stage(&products, &mut report).await;
        let proceed = proceed && self.write_stage(&invoices, &mut report).await;
        if proceed {
            self.write_stage(&invoice_items, &mut report).await;
        }

        report = report.with_duration(start.elapsed());
        report.log_summary();
        report
    }

    /// Write one table through the dual-sink writer
    ///
    /// Returns `false` when the run must halt: either a shutdown request
    /// arrived before this table, or its primary-sink write failed.
    async fn write_stage<R: Record>(&self, records: &[R], report: &mut RunReport) -> bool {
        if *self.shutdown.borrow() {
            tracing::warn!(
                table = %R::TABLE,
                "Shutdown requested, halting before table write"
            );
            report.interrupted = true;
            return false;
        }

        let table_report = self.writer.write_table(records).await;
        let primary_failed = table_report.primary_failed();
        report.tables.push(table_report);

        if primary_failed {
            report.failed_stage = Some(Stage::Write(R::TABLE));
            tracing::error!(
                table = %R::TABLE,
                "Primary sink failed, halting run before subsequent tables"
            );
            return false;
        }

        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::sink::PrimaryWrite;
    use crate::domain::{Result, Table, TallyError};
    use async_trait::async_trait;
    use std::sync::Mutex;
    use std::time::Duration;

    /// Primary sink recording write order, optionally failing one table
    struct RecordingPrimary {
        written: Mutex<Vec<Table>>,
        fail_table: Option<Table>,
    }

    impl RecordingPrimary {
        fn new(fail_table: Option<Table>) -> Self {
            Self {
                written: Mutex::new(Vec::new()),
                fail_table,
            }
        }
    }

    #[async_trait]
    impl PrimarySink for RecordingPrimary {
        async fn test_connection(&self) -> Result<()> {
            Ok(())
        }

        async fn insert_records<R: Record>(&self, records: &[R]) -> Result<PrimaryWrite> {
            self.written.lock().unwrap().push(R::TABLE);
            if self.fail_table == Some(R::TABLE) {
                return Err(TallyError::Pipeline("simulated failure".to_string()));
            }
            Ok(PrimaryWrite {
                rows_attempted: records.len(),
                rows_inserted: records.len(),
                rows_skipped: 0,
            })
        }
    }

    struct OkSecondary;

    #[async_trait]
    impl SecondarySink for OkSecondary {
        async fn upsert_batch<R: Record>(&self, batch: &[R]) -> Result<usize> {
            Ok(batch.len())
        }
    }

    fn raw_row(invoice_no: &str, quantity: i64) -> RawRow {
        RawRow {
            customer_id: Some("17850".to_string()),
            country: "United Kingdom".to_string(),
            stock_code: "71053".to_string(),
            description: Some("WHITE METAL LANTERN".to_string()),
            unit_price: 3.39,
            invoice_no: invoice_no.to_string(),
            invoice_date: "12/1/2010 8:26".to_string(),
            quantity,
        }
    }

    fn orchestrator(
        primary: Arc<RecordingPrimary>,
    ) -> PipelineOrchestrator<RecordingPrimary, OkSecondary> {
        let (_tx, rx) = watch::channel(false);
        PipelineOrchestrator::new(
            primary,
            Arc::new(OkSecondary),
            WriterConfig {
                sink_timeout: Duration::from_secs(5),
                ..WriterConfig::default()
            },
            rx,
        )
    }

    #[tokio::test]
    async fn test_tables_written_in_fixed_order() {
        let primary = Arc::new(RecordingPrimary::new(None));
        let report = orchestrator(primary.clone())
            .run(vec![raw_row("536365", 6), raw_row("536366", 2)], false)
            .await;

        assert!(report.is_successful());
        assert_eq!(
            *primary.written.lock().unwrap(),
            vec![
                Table::Customers,
                Table::Products,
                Table::Invoices,
                Table::InvoiceItems
            ]
        );
    }

    #[tokio::test]
    async fn test_primary_failure_halts_before_subsequent_tables() {
        let primary = Arc::new(RecordingPrimary::new(Some(Table::Products)));
        let report = orchestrator(primary.clone())
            .run(vec![raw_row("536365", 6)], false)
            .await;

        assert!(!report.is_successful());
        assert_eq!(report.failed_stage, Some(Stage::Write(Table::Products)));
        // invoices and invoice_items were never attempted
        assert_eq!(
            *primary.written.lock().unwrap(),
            vec![Table::Customers, Table::Products]
        );
        assert_eq!(report.tables.len(), 2);
    }

    #[tokio::test]
    async fn test_sanitizer_drop_count_reported() {
        let primary = Arc::new(RecordingPrimary::new(None));
        let report = orchestrator(primary)
            .run(vec![raw_row("536365", 6), raw_row("536366", -3)], false)
            .await;

        assert_eq!(report.rows_loaded, 2);
        assert_eq!(report.rows_dropped, 1);
        assert!(report.is_successful());
    }

    #[tokio::test]
    async fn test_worked_example_single_row_per_table() {
        // Two rows sharing customer and product; the second has qty <= 0 and
        // is dropped, so every table ends up with exactly one record.
        let primary = Arc::new(RecordingPrimary::new(None));
        let report = orchestrator(primary)
            .run(vec![raw_row("536365", 6), raw_row("536366", -3)], false)
            .await;

        assert_eq!(report.tables.len(), 4);
        for table in &report.tables {
            assert_eq!(table.primary.rows_attempted, 1);
            assert_eq!(table.primary.rows_inserted, 1);
            assert_eq!(table.secondary.rows_upserted, 1);
        }
    }

    #[tokio::test]
    async fn test_shutdown_before_run_interrupts_without_writes() {
        let (tx, rx) = watch::channel(false);
        tx.send(true).unwrap();

        let primary = Arc::new(RecordingPrimary::new(None));
        let orchestrator = PipelineOrchestrator::new(
            primary.clone(),
            Arc::new(OkSecondary),
            WriterConfig::default(),
            rx,
        );

        let report = orchestrator.run(vec![raw_row("536365", 6)], false).await;

        assert!(report.interrupted);
        assert!(!report.is_successful());
        assert!(primary.written.lock().unwrap().is_empty());
    }
}

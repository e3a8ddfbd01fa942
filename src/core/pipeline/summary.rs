//! Run reporting
//!
//! This module defines structures for tracking and reporting pipeline
//! results, per table and per sink. The pipeline always reports rows
//! attempted vs. committed for each sink, plus any warnings — never a
//! silent partial success.

use crate::domain::Table;
use std::fmt;
use std::time::Duration;
use uuid::Uuid;

/// Pipeline stages, in execution order
///
/// A run advances `Load → Sanitize → Decompose → Dedup → Write(table) per
/// table in write order → Complete`. The failed stage, if any, is recorded
/// on the run report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Load,
    Sanitize,
    Decompose,
    Dedup,
    Write(Table),
    Complete,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Load => write!(f, "load"),
            Stage::Sanitize => write!(f, "sanitize"),
            Stage::Decompose => write!(f, "decompose"),
            Stage::Dedup => write!(f, "dedup"),
            Stage::Write(table) => write!(f, "write({table})"),
            Stage::Complete => write!(f, "complete"),
        }
    }
}

/// Outcome of the primary-sink write for one table
#[derive(Debug, Clone, Default)]
pub struct PrimaryOutcome {
    /// Rows submitted
    pub rows_attempted: usize,

    /// Rows newly inserted
    pub rows_inserted: usize,

    /// Rows skipped because their key already existed (insert-if-absent)
    pub rows_skipped: usize,

    /// Sink-level failure, if any; the table's transaction was rolled back
    pub error: Option<String>,
}

/// Warning attached to one failed or timed-out secondary-sink batch
#[derive(Debug, Clone)]
pub struct BatchWarning {
    /// Zero-based batch index within the table
    pub batch_index: usize,

    /// Rows in the batch
    pub rows: usize,

    /// What went wrong
    pub message: String,
}

/// Outcome of the secondary-sink writes for one table
#[derive(Debug, Clone, Default)]
pub struct SecondaryOutcome {
    /// Rows submitted across all batches
    pub rows_attempted: usize,

    /// Rows accepted by the sink
    pub rows_upserted: usize,

    /// Batches submitted
    pub batches_submitted: usize,

    /// Batches not submitted because shutdown was requested
    pub batches_skipped: usize,

    /// Per-batch warnings; a warning never aborts remaining batches
    pub warnings: Vec<BatchWarning>,
}

/// Combined outcome of writing one table to both sinks
#[derive(Debug, Clone)]
pub struct TableReport {
    pub table: Table,
    pub primary: PrimaryOutcome,
    pub secondary: SecondaryOutcome,
}

impl TableReport {
    /// Whether the primary-sink write failed (fatal for the run)
    pub fn primary_failed(&self) -> bool {
        self.primary.error.is_some()
    }

    /// Whether the secondary sink produced any warnings (non-fatal)
    pub fn has_warnings(&self) -> bool {
        !self.secondary.warnings.is_empty()
    }
}

/// Summary of one pipeline run
#[derive(Debug, Clone)]
pub struct RunReport {
    /// Run identifier
    pub run_id: Uuid,

    /// Raw rows loaded from the source file
    pub rows_loaded: usize,

    /// Rows dropped by the sanitizer's cleaning predicates
    pub rows_dropped: usize,

    /// Per-table, per-sink outcomes, in write order
    pub tables: Vec<TableReport>,

    /// Stage at which the run halted fatally, if any
    pub failed_stage: Option<Stage>,

    /// Whether the run stopped early on a shutdown signal
    pub interrupted: bool,

    /// Whether sink writes were skipped (dry-run mode)
    pub dry_run: bool,

    /// Duration of the run
    pub duration: Duration,
}

impl RunReport {
    /// Create a new empty run report
    pub fn new() -> Self {
        Self {
            run_id: Uuid::new_v4(),
            rows_loaded: 0,
            rows_dropped: 0,
            tables: Vec::new(),
            failed_stage: None,
            interrupted: false,
            dry_run: false,
            duration: Duration::from_secs(0),
        }
    }

    /// Set the duration
    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    /// Whether the run completed without fatal failure or interruption
    pub fn is_successful(&self) -> bool {
        self.failed_stage.is_none() && !self.interrupted
    }

    /// Total secondary-sink warnings across tables
    pub fn warning_count(&self) -> usize {
        self.tables.iter().map(|t| t.secondary.warnings.len()).sum()
    }

    /// Log the summary
    pub fn log_summary(&self) {
        tracing::info!(
            run_id = %self.run_id,
            rows_loaded = self.rows_loaded,
            rows_dropped = self.rows_dropped,
            tables_written = self.tables.len(),
            warnings = self.warning_count(),
            interrupted = self.interrupted,
            dry_run = self.dry_run,
            duration_secs = self.duration.as_secs(),
            "Pipeline run completed"
        );

        for table in &self.tables {
            tracing::info!(
                table = %table.table,
                primary_attempted = table.primary.rows_attempted,
                primary_inserted = table.primary.rows_inserted,
                primary_skipped = table.primary.rows_skipped,
                secondary_attempted = table.secondary.rows_attempted,
                secondary_upserted = table.secondary.rows_upserted,
                "Table result"
            );

            if let Some(error) = &table.primary.error {
                tracing::error!(table = %table.table, error = %error, "Primary sink failed");
            }

            for warning in &table.secondary.warnings {
                tracing::warn!(
                    table = %table.table,
                    batch_index = warning.batch_index,
                    rows = warning.rows,
                    message = %warning.message,
                    "Secondary sink batch warning"
                );
            }
        }

        if let Some(stage) = &self.failed_stage {
            tracing::error!(stage = %stage, "Pipeline halted at stage");
        }
    }
}

impl Default for RunReport {
    fn default() -> Self {
        Self::new()
    }
}

//! Load command implementation
//!
//! This module implements the `load` command: read the transaction export,
//! normalize it, and commit the four entity tables to both sinks.

use crate::adapters::postgres::{PostgresClient, PostgresSink};
use crate::adapters::rest::{RestClient, RestSink};
use crate::adapters::source::read_raw_rows;
use crate::config::load_config;
use crate::core::pipeline::{PipelineOrchestrator, RunReport, WriterConfig};
use clap::Args;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;

/// Arguments for the load command
#[derive(Args, Debug)]
pub struct LoadArgs {
    /// Skip confirmation prompt
    #[arg(short, long)]
    pub yes: bool,

    /// Dry run mode - run the pipeline without writing to either sink
    #[arg(long)]
    pub dry_run: bool,

    /// Override the source file path
    #[arg(long)]
    pub source: Option<String>,

    /// Override the secondary-sink batch size
    #[arg(long)]
    pub batch_size: Option<usize>,
}

impl LoadArgs {
    /// Execute the load command
    pub async fn execute(
        &self,
        config_path: &str,
        shutdown_signal: watch::Receiver<bool>,
    ) -> anyhow::Result<i32> {
        tracing::info!("Starting load command");

        // Load configuration
        let mut config = load_config(config_path)?;

        // Apply CLI overrides
        if let Some(source) = &self.source {
            tracing::info!(source = %source, "Overriding source path from CLI");
            config.source.path = source.clone();
        }

        if let Some(batch_size) = self.batch_size {
            tracing::info!(batch_size = batch_size, "Overriding batch size from CLI");
            config.pipeline.upsert_batch_size = batch_size;
        }

        if self.dry_run {
            tracing::info!("Enabling dry-run mode from CLI");
            config.application.dry_run = true;
        }

        // Validate configuration (again, after overrides)
        if let Err(e) = config.validate() {
            tracing::error!(error = %e, "Configuration validation failed");
            eprintln!("Configuration validation failed: {e}");
            return Ok(2); // Configuration error exit code
        }

        let dry_run = config.application.dry_run;

        if dry_run {
            tracing::info!("Dry run mode enabled - no data will be written");
            println!("🔍 DRY RUN MODE - No data will be written to either sink");
            println!();
        }

        // Confirmation prompt (unless --yes or dry-run)
        if !self.yes && !dry_run {
            println!("Load Configuration:");
            println!("  Source: {}", config.source.path);
            println!("  Batch size: {}", config.pipeline.upsert_batch_size);
            println!(
                "  Concurrent batches: {}",
                config.pipeline.max_concurrent_batches
            );
            println!();
            print!("Proceed with load? [y/N]: ");
            use std::io::{self, Write};
            io::stdout().flush()?;

            let mut input = String::new();
            io::stdin().read_line(&mut input)?;

            if !input.trim().eq_ignore_ascii_case("y") {
                println!("Load cancelled.");
                return Ok(0);
            }
        }

        // Read the source file before touching the sinks
        let source = match read_raw_rows(&config.source.path) {
            Ok(s) => s,
            Err(e) => {
                tracing::error!(error = %e, "Failed to read source file");
                eprintln!("Failed to read source file: {e}");
                return Ok(2); // Configuration error exit code
            }
        };

        if source.rows_unreadable > 0 {
            println!(
                "⚠️  {} unreadable record(s) skipped while parsing the source file",
                source.rows_unreadable
            );
        }

        // Acquire sink handles for the run
        let postgres_client = match PostgresClient::new(config.postgres.clone()) {
            Ok(c) => Arc::new(c),
            Err(e) => {
                tracing::error!(error = %e, "Failed to create PostgreSQL client");
                eprintln!("Failed to initialize primary sink: {e}");
                return Ok(4); // Connection error exit code
            }
        };

        if !dry_run {
            if let Err(e) = postgres_client.test_connection().await {
                tracing::error!(error = %e, "PostgreSQL connection test failed");
                eprintln!("Failed to connect to primary sink: {e}");
                return Ok(4); // Connection error exit code
            }
        }

        let rest_client = match RestClient::new(&config.rest) {
            Ok(c) => Arc::new(c),
            Err(e) => {
                tracing::error!(error = %e, "Failed to create REST client");
                eprintln!("Failed to initialize secondary sink: {e}");
                return Ok(4); // Connection error exit code
            }
        };

        let primary = Arc::new(PostgresSink::new(postgres_client));
        let secondary = Arc::new(RestSink::new(rest_client));

        let writer_config = WriterConfig {
            upsert_batch_size: config.pipeline.upsert_batch_size,
            max_concurrent_batches: config.pipeline.max_concurrent_batches,
            sink_timeout: Duration::from_secs(config.pipeline.sink_timeout_seconds),
            dry_run,
        };

        let orchestrator =
            PipelineOrchestrator::new(primary, secondary, writer_config, shutdown_signal);

        tracing::info!("Executing pipeline");
        println!("🚀 Starting load...");
        println!();

        let report = orchestrator.run(source.rows, dry_run).await;

        print_report(&report);

        // Determine exit code
        let exit_code = if report.interrupted {
            println!();
            println!("⚠️  Load interrupted gracefully.");
            println!("   Both sinks are idempotent; run the same command to retry.");
            println!();
            tracing::info!("Load interrupted by user signal");
            130 // SIGINT exit code (standard Unix convention)
        } else if report.failed_stage.is_some() {
            println!("❌ Load failed");
            5 // Fatal error exit code
        } else if report.warning_count() > 0 {
            println!("⚠️  Load completed with warnings");
            1 // Partial success
        } else {
            println!("✅ Load completed successfully!");
            0
        };

        Ok(exit_code)
    }
}

/// Print the run report to stdout
fn print_report(report: &RunReport) {
    println!();
    println!("📊 Load Summary:");
    println!("  Run ID: {}", report.run_id);
    println!("  Rows loaded: {}", report.rows_loaded);
    println!("  Rows dropped by cleaning: {}", report.rows_dropped);
    println!("  Duration: {:.2}s", report.duration.as_secs_f64());
    println!();

    for table in &report.tables {
        println!("  {}:", table.table);
        match &table.primary.error {
            Some(error) => {
                println!(
                    "    PostgreSQL: FAILED ({}/{} rows, rolled back)",
                    table.primary.rows_inserted, table.primary.rows_attempted
                );
                println!("      Error: {error}");
            }
            None => {
                println!(
                    "    PostgreSQL: {}/{} rows inserted ({} already present)",
                    table.primary.rows_inserted,
                    table.primary.rows_attempted,
                    table.primary.rows_skipped
                );
            }
        }
        println!(
            "    REST API:   {}/{} rows upserted in {} batch(es)",
            table.secondary.rows_upserted,
            table.secondary.rows_attempted,
            table.secondary.batches_submitted
        );
        for warning in &table.secondary.warnings {
            println!(
                "      ⚠️  batch {} ({} rows): {}",
                warning.batch_index, warning.rows, warning.message
            );
        }
        if table.secondary.batches_skipped > 0 {
            println!(
                "      {} batch(es) not submitted (shutdown requested)",
                table.secondary.batches_skipped
            );
        }
    }
    println!();

    if let Some(stage) = &report.failed_stage {
        println!("  Halted at stage: {stage}");
        println!();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_args_defaults() {
        let args = LoadArgs {
            yes: false,
            dry_run: false,
            source: None,
            batch_size: None,
        };

        assert!(!args.yes);
        assert!(!args.dry_run);
        assert!(args.source.is_none());
        assert!(args.batch_size.is_none());
    }

    #[test]
    fn test_load_args_with_overrides() {
        let args = LoadArgs {
            yes: true,
            dry_run: true,
            source: Some("data/other_export.csv".to_string()),
            batch_size: Some(500),
        };

        assert!(args.yes);
        assert!(args.dry_run);
        assert_eq!(args.source, Some("data/other_export.csv".to_string()));
        assert_eq!(args.batch_size, Some(500));
    }
}

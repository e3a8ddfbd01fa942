// tally - Retail Transaction ETL Tool
// Copyright (c) 2025 tally Contributors
// Licensed under the MIT License

//! # tally - Retail Transaction ETL
//!
//! tally ingests a flat, denormalized retail transaction export and loads
//! it into a normalized relational schema held in two independent stores
//! simultaneously: PostgreSQL (the source of truth) and a REST-accessible
//! replica.
//!
//! ## Overview
//!
//! This library provides the core functionality for:
//! - **Sanitizing** raw export rows into a canonical record shape
//! - **Decomposing** rows into customers, products, invoices, and
//!   invoice_items
//! - **Deduplicating** each entity collection on its natural key
//! - **Committing** each collection to both sinks with per-sink conflict
//!   semantics: insert-if-absent on PostgreSQL, batched upsert on the REST
//!   replica
//!
//! ## Architecture
//!
//! tally follows a layered architecture:
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`core`] - Business logic (sanitize, decompose, dedup, pipeline)
//! - [`adapters`] - External integrations (source file, PostgreSQL, REST)
//! - [`domain`] - Core domain types and models
//! - [`config`] - Configuration management
//! - [`logging`] - Structured logging and observability
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use std::time::Duration;
//! use tally::adapters::postgres::{PostgresClient, PostgresSink};
//! use tally::adapters::rest::{RestClient, RestSink};
//! use tally::adapters::source::read_raw_rows;
//! use tally::core::pipeline::{PipelineOrchestrator, WriterConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Load configuration
//!     let config = tally::config::load_config("tally.toml")?;
//!
//!     // Acquire sink handles for the run
//!     let primary = Arc::new(PostgresSink::new(Arc::new(PostgresClient::new(
//!         config.postgres.clone(),
//!     )?)));
//!     let secondary = Arc::new(RestSink::new(Arc::new(RestClient::new(&config.rest)?)));
//!
//!     // Run the pipeline
//!     let (_tx, shutdown) = tokio::sync::watch::channel(false);
//!     let orchestrator = PipelineOrchestrator::new(
//!         primary,
//!         secondary,
//!         WriterConfig::default(),
//!         shutdown,
//!     );
//!     let source = read_raw_rows(&config.source.path)?;
//!     let report = orchestrator.run(source.rows, false).await;
//!
//!     println!("Loaded {} rows", report.rows_loaded);
//!     Ok(())
//! }
//! ```
//!
//! ## Dual-Sink Semantics
//!
//! The two sinks are deliberately asymmetric:
//!
//! - **PostgreSQL** is all-or-nothing per table: one transaction of
//!   parameterized inserts with `ON CONFLICT ... DO NOTHING`. A failure
//!   rolls the table back and halts the run before the next table, keeping
//!   referential order intact.
//! - **The REST replica** is best-effort per batch: fixed-size batches are
//!   upserted by conflict key, a failed batch becomes a warning, and the
//!   run continues.
//!
//! ## Error Handling
//!
//! tally uses the [`domain::TallyError`] type for all errors:
//!
//! ```rust,no_run
//! use tally::domain::TallyError;
//!
//! fn example() -> Result<(), TallyError> {
//!     // Errors are automatically converted using the ? operator
//!     let config = tally::config::load_config("tally.toml")?;
//!     Ok(())
//! }
//! ```
//!
//! ## Logging
//!
//! tally uses structured logging with the `tracing` crate:
//!
//! ```rust,no_run
//! use tracing::{info, warn, error};
//!
//! info!("Starting load");
//! warn!(table = "invoice_items", "Batch rejected");
//! error!(error = "connection reset", "Load failed");
//! ```

pub mod adapters;
pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod logging;

//! External system integrations for tally.
//!
//! This module provides adapters for the pipeline's external collaborators:
//!
//! - [`source`] - flat transaction export reader (CSV, fixed columns)
//! - [`sink`] - sink traits the dual-sink writer is programmed against
//! - [`postgres`] - PostgreSQL implementation of the primary sink
//! - [`rest`] - REST API implementation of the secondary sink
//!
//! # Design Pattern
//!
//! Adapters follow the **Adapter Pattern** to isolate external dependencies
//! and enable testing with mock implementations. The sink layer uses
//! trait-based abstraction so the writer and orchestrator can be exercised
//! against in-memory sinks.

pub mod postgres;
pub mod rest;
pub mod sink;
pub mod source;

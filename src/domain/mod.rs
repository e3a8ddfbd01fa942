//! Domain models and types for tally.
//!
//! This module contains the core domain models, types, and business rules.
//!
//! # Overview
//!
//! The domain layer provides:
//! - **Record shapes** ([`RawRow`], [`CleanRow`], the four entity types)
//! - **Table metadata** ([`Table`], the [`Record`] trait)
//! - **Error types** ([`TallyError`], [`DatabaseError`], [`ApiError`])
//! - **Result type alias** ([`Result`])
//!
//! # Error Handling
//!
//! All fallible operations return [`Result<T, TallyError>`]:
//!
//! ```rust
//! use tally::domain::{Result, TallyError};
//!
//! fn example() -> Result<()> {
//!     Err(TallyError::Pipeline("halted".to_string()))
//! }
//! ```

pub mod errors;
pub mod records;
pub mod result;

// Re-export commonly used types for convenience
pub use errors::{ApiError, DatabaseError, TallyError};
pub use records::{CleanRow, Customer, Invoice, InvoiceItem, Product, RawRow, Record, Table};
pub use result::Result;

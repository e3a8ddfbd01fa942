//! Core business logic
//!
//! The normalization pipeline: sanitize raw rows, decompose into entity
//! collections, deduplicate on natural keys, then commit each collection to
//! both sinks in referential order.

pub mod decompose;
pub mod dedup;
pub mod pipeline;
pub mod sanitize;

//! Sink abstraction
//!
//! Traits the dual-sink writer is programmed against, plus their shared
//! result types.

pub mod traits;

pub use traits::{PrimarySink, PrimaryWrite, SecondarySink};

//! Pipeline orchestration
//!
//! The dual-sink write phase: the writer commits one entity collection to
//! both sinks, the orchestrator sequences tables in referential order and
//! aggregates outcomes.

pub mod orchestrator;
pub mod summary;
pub mod writer;

pub use orchestrator::PipelineOrchestrator;
pub use summary::{BatchWarning, PrimaryOutcome, RunReport, SecondaryOutcome, Stage, TableReport};
pub use writer::{DualSinkWriter, WriterConfig};

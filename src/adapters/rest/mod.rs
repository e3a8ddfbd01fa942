//! REST API integration (secondary sink)

pub mod client;
pub mod sink;

pub use client::RestClient;
pub use sink::RestSink;

//! PostgreSQL integration (primary sink)

pub mod client;
pub mod query;
pub mod sink;

pub use client::PostgresClient;
pub use query::{run_query, QueryOutput};
pub use sink::PostgresSink;

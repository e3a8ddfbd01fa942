//! REST secondary sink
//!
//! Implements the best-effort batched upsert contract over the REST client.
//! Each call submits exactly one batch; the dual-sink writer owns batch
//! slicing, concurrency, and warning collection.

use crate::adapters::rest::client::RestClient;
use crate::adapters::sink::SecondarySink;
use crate::domain::{Record, Result};
use async_trait::async_trait;
use std::sync::Arc;

/// Secondary sink backed by the REST API
pub struct RestSink {
    client: Arc<RestClient>,
}

impl RestSink {
    /// Create a new REST sink over a shared client
    pub fn new(client: Arc<RestClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl SecondarySink for RestSink {
    async fn upsert_batch<R: Record>(&self, batch: &[R]) -> Result<usize> {
        let rows = serde_json::to_value(batch)?;
        let on_conflict = R::UPSERT_KEY_COLUMNS.join(",");

        self.client
            .upsert(R::TABLE.as_str(), &on_conflict, &rows)
            .await?;

        Ok(batch.len())
    }
}

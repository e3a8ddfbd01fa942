//! REST API client
//!
//! Client for the secondary sink's PostgREST-style upsert endpoint. Each
//! table is a resource path; a batch is posted as a JSON array with an
//! `on_conflict` key specification and merge-duplicates resolution, so a
//! replayed batch is idempotent.

use crate::config::schema::RestConfig;
use crate::domain::{ApiError, Result, TallyError};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use secrecy::ExposeSecret;
use serde_json::Value;
use std::time::Duration;

/// REST client for tally
pub struct RestClient {
    http: reqwest::Client,
    base_url: String,
}

impl RestClient {
    /// Create a new REST client
    ///
    /// The API key is sent as both `apikey` and bearer authorization,
    /// marked sensitive so it never appears in logs.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built or the API key
    /// is not a valid header value.
    pub fn new(config: &RestConfig) -> Result<Self> {
        let key = config.api_key.expose_secret();

        let mut api_key_value = HeaderValue::from_str(key.as_ref())
            .map_err(|e| TallyError::Configuration(format!("Invalid API key: {e}")))?;
        api_key_value.set_sensitive(true);

        let mut auth_value = HeaderValue::from_str(&format!("Bearer {}", key.as_ref()))
            .map_err(|e| TallyError::Configuration(format!("Invalid API key: {e}")))?;
        auth_value.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert("apikey", api_key_value);
        headers.insert(AUTHORIZATION, auth_value);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(config.request_timeout_seconds))
            .build()
            .map_err(|e| ApiError::ConnectionFailed(e.to_string()))?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Base URL the client posts to
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Upsert one batch of rows into a table
    ///
    /// # Errors
    ///
    /// Returns an error if the request cannot be sent, times out, or the
    /// server rejects the batch.
    pub async fn upsert(&self, table: &str, on_conflict: &str, rows: &Value) -> Result<()> {
        let url = format!("{}/{}", self.base_url, table);

        let response = self
            .http
            .post(&url)
            .query(&[("on_conflict", on_conflict)])
            .header("Prefer", "resolution=merge-duplicates,return=minimal")
            .json(rows)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    TallyError::Api(ApiError::Timeout(e.to_string()))
                } else {
                    TallyError::Api(ApiError::ConnectionFailed(e.to_string()))
                }
            })?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        let message = response
            .text()
            .await
            .unwrap_or_else(|_| "<unreadable response body>".to_string());

        Err(ApiError::UpsertFailed {
            table: table.to_string(),
            status: status.as_u16(),
            message,
        }
        .into())
    }
}

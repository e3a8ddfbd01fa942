//! Domain error types
//!
//! This module defines the error hierarchy for tally. All errors are
//! domain-specific and don't expose third-party types.

use thiserror::Error;

/// Main tally error type
///
/// This is the primary error type used throughout the application.
/// It wraps sink-specific error types and provides context for error handling.
#[derive(Debug, Error)]
pub enum TallyError {
    /// Configuration-related errors (including structurally invalid input,
    /// e.g. a source file missing required columns)
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Source file errors (unreadable file, malformed CSV structure)
    #[error("Source error: {0}")]
    Source(String),

    /// Primary sink (PostgreSQL) errors
    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),

    /// Secondary sink (REST API) errors
    #[error("API error: {0}")]
    Api(#[from] ApiError),

    /// Pipeline orchestration errors
    #[error("Pipeline error: {0}")]
    Pipeline(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// Generic errors with context
    #[error("{0}")]
    Other(String),
}

/// Primary-sink (PostgreSQL) errors
///
/// Errors raised while talking to the relational store. These errors don't
/// expose tokio-postgres or pool types.
#[derive(Debug, Error)]
pub enum DatabaseError {
    /// Failed to connect or acquire a pooled connection
    #[error("Failed to connect to PostgreSQL: {0}")]
    ConnectionFailed(String),

    /// Failed to open or commit a transaction
    #[error("Transaction failed: {0}")]
    TransactionFailed(String),

    /// Bulk insert statement failed
    #[error("Insert failed for table {table}: {message}")]
    InsertFailed { table: String, message: String },

    /// Ad-hoc query failed
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Statement or connection timed out
    #[error("Database timeout: {0}")]
    Timeout(String),
}

/// Secondary-sink (REST API) errors
///
/// Errors raised while talking to the HTTP upsert endpoint. These errors
/// don't expose reqwest types.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Failed to reach the API endpoint
    #[error("Failed to connect to API: {0}")]
    ConnectionFailed(String),

    /// Upsert batch rejected by the server
    #[error("Upsert failed for table {table}: {status} - {message}")]
    UpsertFailed {
        table: String,
        status: u16,
        message: String,
    },

    /// Request timed out
    #[error("Request timeout: {0}")]
    Timeout(String),

    /// Response could not be interpreted
    #[error("Invalid response from API: {0}")]
    InvalidResponse(String),
}

// Conversion from std::io::Error
impl From<std::io::Error> for TallyError {
    fn from(err: std::io::Error) -> Self {
        TallyError::Io(err.to_string())
    }
}

// Conversion from serde_json::Error
impl From<serde_json::Error> for TallyError {
    fn from(err: serde_json::Error) -> Self {
        TallyError::Serialization(err.to_string())
    }
}

// Conversion from toml parse errors
impl From<toml::de::Error> for TallyError {
    fn from(err: toml::de::Error) -> Self {
        TallyError::Configuration(format!("TOML parse error: {err}"))
    }
}

// Conversion from csv errors. Record-level csv errors are handled inside the
// source reader; anything that bubbles up here is structural.
impl From<csv::Error> for TallyError {
    fn from(err: csv::Error) -> Self {
        TallyError::Source(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tally_error_display() {
        let err = TallyError::Configuration("Invalid config".to_string());
        assert_eq!(err.to_string(), "Configuration error: Invalid config");
    }

    #[test]
    fn test_database_error_conversion() {
        let db_err = DatabaseError::ConnectionFailed("connection refused".to_string());
        let err: TallyError = db_err.into();
        assert!(matches!(err, TallyError::Database(_)));
    }

    #[test]
    fn test_api_error_conversion() {
        let api_err = ApiError::UpsertFailed {
            table: "customers".to_string(),
            status: 500,
            message: "internal error".to_string(),
        };
        let err: TallyError = api_err.into();
        assert!(matches!(err, TallyError::Api(_)));
        assert!(err.to_string().contains("customers"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "File not found");
        let err: TallyError = io_err.into();
        assert!(matches!(err, TallyError::Io(_)));
    }

    #[test]
    fn test_serde_json_error_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("invalid json").unwrap_err();
        let err: TallyError = json_err.into();
        assert!(matches!(err, TallyError::Serialization(_)));
    }

    #[test]
    fn test_toml_error_conversion() {
        let toml_err = toml::from_str::<toml::Value>("invalid = toml = syntax").unwrap_err();
        let err: TallyError = toml_err.into();
        assert!(matches!(err, TallyError::Configuration(_)));
        assert!(err.to_string().contains("TOML parse error"));
    }

    #[test]
    fn test_errors_implement_std_error() {
        let err = TallyError::Pipeline("test".to_string());
        let _: &dyn std::error::Error = &err;

        let db_err = DatabaseError::Timeout("statement timeout".to_string());
        let _: &dyn std::error::Error = &db_err;

        let api_err = ApiError::Timeout("30s".to_string());
        let _: &dyn std::error::Error = &api_err;
    }
}

//! Configuration management for tally.
//!
//! This module provides TOML-based configuration loading, parsing, and
//! validation.
//!
//! # Overview
//!
//! tally uses TOML configuration files with support for:
//! - Environment variable substitution (`${VAR_NAME}`)
//! - Environment variable overrides (`TALLY_*` prefix)
//! - Default values for optional settings
//! - Comprehensive validation
//! - Type-safe configuration structs
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use tally::config::load_config;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("tally.toml")?;
//!
//! println!("Source file: {}", config.source.path);
//! println!("Upsert batch size: {}", config.pipeline.upsert_batch_size);
//! # Ok(())
//! # }
//! ```
//!
//! # Example Configuration
//!
//! ```toml
//! [application]
//! log_level = "info"
//!
//! [source]
//! path = "data/online_retail.csv"
//!
//! [pipeline]
//! upsert_batch_size = 1000
//! max_concurrent_batches = 4
//!
//! [postgres]
//! connection_string = "${TALLY_DATABASE_URL}"
//!
//! [rest]
//! base_url = "https://project.example.co/rest/v1"
//! api_key = "${TALLY_REST_API_KEY}"
//! ```

pub mod loader;
pub mod schema;
pub mod secret;

// Re-export commonly used types
pub use loader::load_config;
pub use schema::{
    ApplicationConfig, LoggingConfig, PipelineConfig, PostgresConfig, RestConfig, SourceConfig,
    TallyConfig,
};
pub use secret::{secret_string, SecretString, SecretValue};

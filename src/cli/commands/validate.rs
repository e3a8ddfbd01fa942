//! Validate config command implementation
//!
//! This module implements the `validate-config` command for validating
//! the tally configuration file.

use crate::config::load_config;
use clap::Args;

/// Arguments for the validate-config command
#[derive(Args, Debug)]
pub struct ValidateArgs {}

impl ValidateArgs {
    /// Execute the validate-config command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!(config_path = %config_path, "Validating configuration");

        println!("🔍 Validating configuration file: {config_path}");
        println!();

        // load_config validates after parsing
        let config = match load_config(config_path) {
            Ok(c) => {
                println!("✅ Configuration file loaded successfully");
                c
            }
            Err(e) => {
                println!("❌ Failed to load configuration file");
                println!("   Error: {e}");
                return Ok(2); // Configuration error exit code
            }
        };

        println!("✅ Configuration is valid");
        println!();
        println!("Configuration Summary:");
        println!("  Log Level: {}", config.application.log_level);
        println!("  Source: {}", config.source.path);
        println!("  Upsert batch size: {}", config.pipeline.upsert_batch_size);
        println!(
            "  Concurrent batches: {}",
            config.pipeline.max_concurrent_batches
        );
        println!(
            "  Sink timeout: {}s",
            config.pipeline.sink_timeout_seconds
        );

        // Redact credentials in the summary
        let connection = config
            .postgres
            .connection_string
            .split('@')
            .next_back()
            .unwrap_or("***");
        println!("  PostgreSQL: postgresql://***@{connection}");
        println!("  REST endpoint: {}", config.rest.base_url);
        println!("  REST API key: ***");
        println!();

        Ok(0)
    }
}

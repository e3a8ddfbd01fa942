//! Status command implementation
//!
//! This module implements the `status` command: report row counts per
//! normalized table in the primary sink.

use crate::adapters::postgres::{run_query, PostgresClient};
use crate::config::load_config;
use crate::domain::Table;
use clap::Args;

/// Arguments for the status command
#[derive(Args, Debug)]
pub struct StatusArgs {}

impl StatusArgs {
    /// Execute the status command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!("Checking sink status");

        println!("📊 Primary Sink Status");
        println!();

        let config = match load_config(config_path) {
            Ok(c) => c,
            Err(e) => {
                println!("❌ Failed to load configuration file");
                println!("   Error: {e}");
                return Ok(2); // Configuration error exit code
            }
        };

        let client = match PostgresClient::new(config.postgres.clone()) {
            Ok(c) => c,
            Err(e) => {
                println!("❌ Failed to initialize database client");
                println!("   Error: {e}");
                return Ok(4); // Connection error exit code
            }
        };

        if let Err(e) = client.test_connection().await {
            println!("❌ Failed to connect to database");
            println!("   Error: {e}");
            return Ok(4); // Connection error exit code
        }

        println!("  Database: {}", client.connection_string_safe());
        println!();

        for table in Table::WRITE_ORDER {
            let sql = format!("SELECT count(*) FROM {table}");
            match run_query(&client, &sql).await {
                Ok(output) => {
                    let count = output
                        .rows
                        .first()
                        .and_then(|row| row.first())
                        .cloned()
                        .unwrap_or(serde_json::Value::Null);
                    println!("  {table}: {count} row(s)");
                }
                Err(e) => {
                    println!("  {table}: unavailable ({e})");
                }
            }
        }
        println!();

        Ok(0)
    }
}

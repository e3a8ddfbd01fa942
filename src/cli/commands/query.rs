//! Query command implementation
//!
//! This module implements the `query` command: execute an ad-hoc SQL
//! statement against the primary sink and print columns plus rows. The
//! statement itself comes from the caller; generating it is out of scope.

use crate::adapters::postgres::{run_query, PostgresClient};
use crate::config::load_config;
use clap::Args;

/// Arguments for the query command
#[derive(Args, Debug)]
pub struct QueryArgs {
    /// SQL statement to execute
    pub sql: String,

    /// Print the result as JSON instead of a table
    #[arg(long)]
    pub json: bool,
}

impl QueryArgs {
    /// Execute the query command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!("Starting query command");

        let config = match load_config(config_path) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("Failed to load configuration: {e}");
                return Ok(2); // Configuration error exit code
            }
        };

        let client = match PostgresClient::new(config.postgres.clone()) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("Failed to initialize database client: {e}");
                return Ok(4); // Connection error exit code
            }
        };

        let output = match run_query(&client, &self.sql).await {
            Ok(o) => o,
            Err(e) => {
                tracing::error!(error = %e, "Query failed");
                eprintln!("Query failed: {e}");
                return Ok(5); // Fatal error exit code
            }
        };

        if self.json {
            println!("{}", serde_json::to_string_pretty(&output)?);
        } else {
            if !output.columns.is_empty() {
                println!("{}", output.columns.join(" | "));
            }
            for row in &output.rows {
                let rendered: Vec<String> = row
                    .iter()
                    .map(|value| match value {
                        serde_json::Value::Null => String::new(),
                        serde_json::Value::String(s) => s.clone(),
                        other => other.to_string(),
                    })
                    .collect();
                println!("{}", rendered.join(" | "));
            }
            println!();
            println!("{} row(s)", output.rows.len());
        }

        Ok(0)
    }
}

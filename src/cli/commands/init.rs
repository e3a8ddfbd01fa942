//! Init command implementation
//!
//! This module implements the `init` command for generating a sample
//! configuration file.

use clap::Args;
use std::fs;
use std::path::Path;

/// Arguments for the init command
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Path where to create the configuration file
    #[arg(short, long, default_value = "tally.toml")]
    pub output: String,

    /// Overwrite existing file
    #[arg(long)]
    pub force: bool,
}

impl InitArgs {
    /// Execute the init command
    pub async fn execute(&self) -> anyhow::Result<i32> {
        tracing::info!(output = %self.output, "Initializing configuration file");

        println!("📝 Initializing tally configuration");
        println!();

        // Check if file already exists
        if Path::new(&self.output).exists() && !self.force {
            println!("❌ Configuration file already exists: {}", self.output);
            println!("   Use --force to overwrite");
            return Ok(2); // Configuration error exit code
        }

        match fs::write(&self.output, Self::generate_config()) {
            Ok(_) => {
                println!("✅ Configuration file created: {}", self.output);
                println!();
                println!("Next steps:");
                println!("  1. Edit {} with your settings", self.output);
                println!("  2. Create a .env file with your credentials:");
                println!("     - Set TALLY_DATABASE_URL");
                println!("     - Set TALLY_REST_API_KEY");
                println!("  3. Validate configuration: tally validate-config");
                println!("  4. Run the pipeline: tally load");
                println!();
                Ok(0)
            }
            Err(e) => {
                println!("❌ Failed to write configuration file");
                println!("   Error: {e}");
                Ok(5) // Fatal error exit code
            }
        }
    }

    /// Generate the sample configuration content
    fn generate_config() -> String {
        r#"# tally configuration

[application]
# Log level: trace, debug, info, warn, error
log_level = "info"
# Dry run: run the pipeline without writing to either sink
dry_run = false

[source]
# Path to the transaction export CSV (ISO-8859-1 encoded)
path = "data/online_retail.csv"

[pipeline]
# Rows per secondary-sink upsert batch
upsert_batch_size = 1000
# Concurrent secondary-sink batch submissions
max_concurrent_batches = 4
# Timeout applied to each sink call, in seconds
sink_timeout_seconds = 60

[postgres]
# Primary sink connection string
connection_string = "${TALLY_DATABASE_URL}"
max_connections = 10
connection_timeout_seconds = 30
statement_timeout_seconds = 60

[rest]
# Secondary sink upsert endpoint
base_url = "https://your-project.example.co/rest/v1"
api_key = "${TALLY_REST_API_KEY}"
request_timeout_seconds = 30

[logging]
# Optional rotating JSON file logs
local_enabled = false
local_path = "logs"
local_rotation = "daily"
"#
        .to_string()
    }
}

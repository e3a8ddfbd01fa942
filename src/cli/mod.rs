//! CLI interface and argument parsing
//!
//! This module provides the command-line interface for tally using clap.

pub mod commands;

use clap::{Parser, Subcommand};

/// tally - retail transaction ETL
#[derive(Parser, Debug)]
#[command(name = "tally")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "tally.toml", env = "TALLY_CONFIG")]
    pub config: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "TALLY_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the normalization pipeline against both sinks
    Load(commands::load::LoadArgs),

    /// Execute an ad-hoc SQL query against the primary sink
    Query(commands::query::QueryArgs),

    /// Show row counts per table in the primary sink
    Status(commands::status::StatusArgs),

    /// Validate configuration file
    ValidateConfig(commands::validate::ValidateArgs),

    /// Initialize a new configuration file
    Init(commands::init::InitArgs),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse_load() {
        let cli = Cli::parse_from(["tally", "load"]);
        assert_eq!(cli.config, "tally.toml");
        assert!(matches!(cli.command, Commands::Load(_)));
    }

    #[test]
    fn test_cli_parse_with_config() {
        let cli = Cli::parse_from(["tally", "--config", "custom.toml", "load"]);
        assert_eq!(cli.config, "custom.toml");
    }

    #[test]
    fn test_cli_parse_with_log_level() {
        let cli = Cli::parse_from(["tally", "--log-level", "debug", "load"]);
        assert_eq!(cli.log_level, Some("debug".to_string()));
    }

    #[test]
    fn test_cli_parse_query() {
        let cli = Cli::parse_from(["tally", "query", "SELECT 1"]);
        assert!(matches!(cli.command, Commands::Query(_)));
    }

    #[test]
    fn test_cli_parse_status() {
        let cli = Cli::parse_from(["tally", "status"]);
        assert!(matches!(cli.command, Commands::Status(_)));
    }

    #[test]
    fn test_cli_parse_validate_config() {
        let cli = Cli::parse_from(["tally", "validate-config"]);
        assert!(matches!(cli.command, Commands::ValidateConfig(_)));
    }

    #[test]
    fn test_cli_parse_init() {
        let cli = Cli::parse_from(["tally", "init"]);
        assert!(matches!(cli.command, Commands::Init(_)));
    }
}

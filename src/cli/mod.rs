//! CLI interface and argument parsing
//!
//! This module provides the command-line interface using clap.

pub mod commands;

use clap::{Parser, Subcommand};

/// Azure Cosmos DB getting-started samples
#[derive(Parser, Debug)]
#[command(name = "cosmos-family")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "cosmos-family.toml", env = "COSMOS_FAMILY_CONFIG")]
    pub config: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "COSMOS_FAMILY_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Provision, create families, read them back and run a query
    Run(commands::run::RunArgs),

    /// Validate configuration file
    ValidateConfig(commands::validate::ValidateArgs),

    /// Initialize a new configuration file
    Init(commands::init::InitArgs),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse_run() {
        let cli = Cli::parse_from(["cosmos-family", "run"]);
        assert_eq!(cli.config, "cosmos-family.toml");
        assert!(matches!(cli.command, Commands::Run(_)));
    }

    #[test]
    fn test_cli_parse_run_flags() {
        let cli = Cli::parse_from([
            "cosmos-family",
            "--config",
            "custom.toml",
            "run",
            "--mode",
            "concurrent",
            "--count",
            "15",
            "--query",
            "undistricted-with-sons",
            "--page-size",
            "5",
            "--max-pages",
            "1",
            "--dry-run",
        ]);
        assert_eq!(cli.config, "custom.toml");
        let Commands::Run(args) = cli.command else {
            panic!("expected run");
        };
        assert_eq!(args.mode.as_deref(), Some("concurrent"));
        assert_eq!(args.count, Some(15));
        assert_eq!(args.page_size, Some(5));
        assert_eq!(args.max_pages, Some(1));
        assert!(args.dry_run);
    }

    #[test]
    fn test_cli_rejects_unknown_mode() {
        assert!(Cli::try_parse_from(["cosmos-family", "run", "--mode", "parallel"]).is_err());
    }

    #[test]
    fn test_cli_parse_with_log_level() {
        let cli = Cli::parse_from(["cosmos-family", "--log-level", "debug", "validate-config"]);
        assert_eq!(cli.log_level, Some("debug".to_string()));
        assert!(matches!(cli.command, Commands::ValidateConfig(_)));
    }

    #[test]
    fn test_cli_parse_init() {
        let cli = Cli::parse_from(["cosmos-family", "init", "--force"]);
        assert!(matches!(cli.command, Commands::Init(ref args) if args.force));
    }
}

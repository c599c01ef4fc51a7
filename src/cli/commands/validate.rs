//! Validate config command implementation
//!
//! This module implements the `validate-config` command for validating
//! the configuration file.

use super::run::EXIT_CONFIGURATION;
use crate::config::load_config;
use crate::config::schema::{AuthMode, StoreTarget};
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

        // load_config validates as well
        let config = match load_config(config_path) {
            Ok(c) => c,
            Err(e) => {
                println!("❌ Configuration is invalid");
                println!("   Error: {e}");
                return Ok(EXIT_CONFIGURATION);
            }
        };

        let query = match config.demo.resolve_query() {
            Ok(q) => q,
            Err(e) => {
                println!("❌ Configuration is invalid");
                println!("   Error: {e}");
                return Ok(EXIT_CONFIGURATION);
            }
        };

        println!("✅ Configuration is valid");
        println!();
        println!("Configuration Summary:");
        println!("  Log Level: {}", config.application.log_level);
        println!("  Dry Run: {}", config.application.dry_run);

        match config.effective_store() {
            StoreTarget::CosmosDB => {
                if let Some(ref cosmos) = config.cosmosdb {
                    println!("  Store: Cosmos DB");
                    println!("  Endpoint: {}", cosmos.endpoint);
                    println!(
                        "  Auth: {}",
                        match cosmos.auth.mode {
                            AuthMode::Key => "account key".to_string(),
                            AuthMode::Credential => format!("{:?} credential", cosmos.auth.credential),
                        }
                    );
                    println!("  Database: {}", cosmos.database_name);
                    println!(
                        "  Container: {} (partition key {}, throughput {})",
                        cosmos.container_name,
                        cosmos.partition_key,
                        cosmos
                            .throughput
                            .map_or("database".to_string(), |t| format!("{t} RU/s"))
                    );
                    println!("  Provision: {}", cosmos.provision);
                }
            }
            StoreTarget::Memory => println!("  Store: in-memory"),
        }

        println!("  Mode: {:?}", config.demo.mode);
        println!("  Families: {:?}", config.demo.source);
        println!("  Query: {} ({})", query.name(), query.to_sql());
        println!(
            "  Paging: {} per page, {}",
            config.demo.page_size,
            config
                .demo
                .max_pages
                .map_or("all pages".to_string(), |p| format!("at most {p} pages"))
        );
        println!();
        Ok(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[tokio::test]
    async fn test_validate_missing_file() {
        let code = ValidateArgs {}.execute("missing.toml").await.unwrap();
        assert_eq!(code, EXIT_CONFIGURATION);
    }

    #[tokio::test]
    async fn test_validate_memory_config() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"store = \"memory\"\n[demo]\nquery = \"not-andersen\"\n")
            .unwrap();
        file.flush().unwrap();

        let code = ValidateArgs {}
            .execute(file.path().to_str().unwrap())
            .await
            .unwrap();
        assert_eq!(code, 0);
    }
}
